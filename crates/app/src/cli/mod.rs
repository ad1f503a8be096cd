use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use vendora_app::{
    config::{LoggingConfig, PricingConfig, StoreConfig, StoreKind},
    context::AppContext,
    domain::users::{data::Actor, records::UserUuid},
    observability,
};

mod price;
mod vendor;

#[derive(Debug, Parser)]
#[command(name = "vendora-app", about = "Vendora vendor administration", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(flatten)]
    store: StoreConfig,

    #[command(flatten)]
    pricing: PricingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Vendor applications, review and discounts
    Vendor(vendor::VendorCommand),

    /// Price a product for a user
    Price(price::PriceArgs),
}

impl Commands {
    fn needs_stored_vendors(&self) -> bool {
        match self {
            Self::Vendor(command) => command.needs_stored_vendors(),
            Self::Price(_) => false,
        }
    }
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        if self.store.store == StoreKind::Memory && self.command.needs_stored_vendors() {
            return Err(
                "the memory store keeps no vendors between commands; use --store postgres"
                    .to_string(),
            );
        }

        observability::init(&self.logging).map_err(|error| error.to_string())?;

        let context = AppContext::from_config(&self.store)
            .await
            .map_err(|error| format!("failed to initialise: {error}"))?;

        match self.command {
            Commands::Vendor(command) => vendor::run(&context, command).await,
            Commands::Price(args) => price::run(&context, &self.pricing, args).await,
        }
    }
}

/// The admin performing a change.
#[derive(Debug, Args)]
pub(crate) struct ActorArgs {
    /// UID of the acting admin
    #[arg(long, env = "VENDORA_ACTOR_UID")]
    actor_uid: UserUuid,

    /// Display name of the acting admin, recorded in the audit log
    #[arg(long, env = "VENDORA_ACTOR_NAME")]
    actor_name: String,
}

impl From<ActorArgs> for Actor {
    fn from(args: ActorArgs) -> Self {
        Actor::new(args.actor_uid, args.actor_name)
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|error| format!("failed to encode output: {error}"))?;

    #[expect(clippy::print_stdout, reason = "command output")]
    {
        println!("{json}");
    }

    Ok(())
}
