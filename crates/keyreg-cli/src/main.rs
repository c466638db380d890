/*!
 * keyreg admin CLI
 *
 * Operates on a local registry database:
 * 1. Generate caller keypairs and sign assertions
 * 2. Register addresses and read identities back
 * 3. Administer identities (delete, public key, key rotation)
 *
 * Usage:
 *   keyreg keygen
 *   keyreg sign --private-key <b64> "register"
 *   keyreg register --tenant t --customer c --address <b64> --public-key <b64> \
 *       --string-to-sign register --signature <b64>
 *   keyreg rotate --tenant t --customer c
 */

mod commands;
mod config;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use keyreg_crypto::HashAlgorithm;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;

#[derive(Parser)]
#[command(name = "keyreg")]
#[command(about = "Admin CLI for the keyreg identity registry")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the registry database (overrides DATABASE_PATH)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Address hash algorithm (overrides ADDRESS_HASH_ALGORITHM)
    #[arg(long, global = true)]
    hash: Option<HashAlgorithm>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

/// Natural key of an identity
#[derive(Args, Debug)]
struct IdentityArgs {
    /// Tenant ID
    #[arg(short, long)]
    tenant: String,

    /// Customer ID
    #[arg(short, long)]
    customer: String,
}

/// Signature assertion made by the caller
#[derive(Args, Debug)]
struct AssertionArgs {
    /// Caller public key (base64)
    #[arg(long)]
    public_key: String,

    /// Signed plaintext
    #[arg(long)]
    string_to_sign: String,

    /// Signature over the plaintext (base64)
    #[arg(long)]
    signature: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a caller keypair and its address
    Keygen,
    /// Sign a plaintext, producing a signature assertion
    Sign {
        /// Caller private key (base64)
        #[arg(short, long)]
        private_key: String,

        /// Plaintext to sign
        message: String,
    },
    /// Register an address for a customer
    Register {
        #[command(flatten)]
        identity: IdentityArgs,

        /// Address being registered (base64)
        #[arg(short, long)]
        address: String,

        #[command(flatten)]
        assertion: AssertionArgs,
    },
    /// Show a customer's addresses and current signing key
    Get {
        #[command(flatten)]
        identity: IdentityArgs,

        #[command(flatten)]
        assertion: AssertionArgs,
    },
    /// Delete an identity with its addresses and key history
    Delete {
        #[command(flatten)]
        identity: IdentityArgs,
    },
    /// Show the public key of the current signing key
    Pubkey {
        #[command(flatten)]
        identity: IdentityArgs,
    },
    /// Issue a new signing key for an identity
    Rotate {
        #[command(flatten)]
        identity: IdentityArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keyreg=info,keyreg_core=info,keyreg_storage=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.database, cli.hash);
    let json = cli.json;

    match cli.command {
        Commands::Keygen => commands::keys::keygen(&config, json)?,

        Commands::Sign {
            private_key,
            message,
        } => commands::keys::sign(&private_key, &message, json)?,

        Commands::Register {
            identity,
            address,
            assertion,
        } => {
            commands::identity::register(
                &config,
                &identity.tenant,
                &identity.customer,
                address,
                assertion.into(),
                json,
            )
            .await?
        }

        Commands::Get {
            identity,
            assertion,
        } => {
            commands::identity::get(
                &config,
                &identity.tenant,
                &identity.customer,
                assertion.into(),
                json,
            )
            .await?
        }

        Commands::Delete { identity } => {
            commands::admin::delete(&config, &identity.tenant, &identity.customer).await?
        }

        Commands::Pubkey { identity } => {
            commands::admin::public_key(&config, &identity.tenant, &identity.customer).await?
        }

        Commands::Rotate { identity } => {
            commands::admin::rotate(&config, &identity.tenant, &identity.customer).await?
        }
    }

    Ok(())
}

impl From<AssertionArgs> for keyreg_core::SignatureAssertion {
    fn from(args: AssertionArgs) -> Self {
        Self {
            public_key: args.public_key,
            string_to_sign: args.string_to_sign,
            signature: args.signature,
        }
    }
}
