//! Encrypt a credential with the configured key/IV and store it in the `keys`
//! collection, or print the ciphertext with `--print-only`.

use clap::Parser;
use portfolio_api::config::Config;
use portfolio_api::crypto::AesCbcCipher;
use portfolio_api::db::{ContentStore, SecretRecord};

#[derive(Debug, Parser)]
#[command(about = "Seal a credential into the portfolio secret store")]
struct Args {
    /// Secret name, e.g. ClientID, ClientSecret, RefreshToken, APIKey.
    name: String,

    /// Plaintext value; read from SEAL_VALUE when omitted.
    #[arg(long, env = "SEAL_VALUE", hide_env_values = true)]
    value: String,

    /// Print the ciphertext instead of writing it.
    #[arg(long)]
    print_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let cfg = Config::load()?;

    let cipher = AesCbcCipher::from_hex(&cfg.encryption_key, &cfg.encryption_iv)?;
    let ciphertext = cipher.encrypt(&args.value);

    if args.print_only {
        println!("{ciphertext}");
        return Ok(());
    }

    let store = ContentStore::connect(&cfg.database_url, 1).await?;
    store
        .insert_secret(&SecretRecord {
            name: args.name.clone(),
            ciphertext,
        })
        .await?;
    println!("stored secret `{}`", args.name);
    Ok(())
}
