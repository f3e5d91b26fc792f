mod actions;
mod menu;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pebo::{
    Dispatcher, DispatcherConfig, FireStrategy, InlinePromises, PromiseProvider, TokioPromises,
};

use crate::actions::{Order, Pizzaiolo};

#[derive(Parser)]
#[command(name = "pebo-pizzeria", about = "Fire pizza orders through a pebo dispatcher")]
struct Cli {
    /// Pizzas to fire, in order
    #[arg(default_values_t = [menu::MARGHERITA.to_string(), menu::REGINA.to_string()])]
    pizzas: Vec<String>,

    /// Firing strategy. Omit to use `fire` with PEBO_FIRE_STRATEGY (default: sequential)
    #[arg(long)]
    strategy: Option<FireStrategy>,

    /// Promise provider driving the listeners
    #[arg(long, value_enum, default_value_t = ProviderKind::Tokio)]
    provider: ProviderKind,

    /// Who makes the pizza
    #[arg(long, env = "PIZZAIOLO_NAME", default_value = "Mario")]
    pizzaiolo: String,

    /// Starting ingredients line
    #[arg(long, default_value = "Ingredients:")]
    ingredients: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProviderKind {
    /// One tokio task per listener
    Tokio,
    /// Listeners polled by the firing task
    Inline,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pebo=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = DispatcherConfig::from_env()?;
    let chef = Pizzaiolo::new(cli.pizzaiolo.clone());

    info!(
        pizzaiolo = chef.name.as_str(),
        provider = ?cli.provider,
        default_strategy = %config.default_strategy,
        "Pizzeria open"
    );

    match cli.provider {
        ProviderKind::Tokio => {
            serve(Dispatcher::from_parts(chef, TokioPromises, config), &cli).await
        }
        ProviderKind::Inline => {
            serve(Dispatcher::from_parts(chef, InlinePromises, config), &cli).await
        }
    }
}

async fn serve<P: PromiseProvider>(
    mut dispatcher: Dispatcher<Order, Pizzaiolo, P>,
    cli: &Cli,
) -> Result<()> {
    menu::register(&mut dispatcher);

    for pizza in &cli.pizzas {
        if !menu::is_on_menu(pizza) {
            warn!(
                pizza = pizza.as_str(),
                "Not on the menu, the order comes back untouched"
            );
        }

        let strategy = cli.strategy.unwrap_or(dispatcher.default_strategy());
        info!(pizza = pizza.as_str(), strategy = %strategy, "Before emitting");

        let order = Order::new(cli.ingredients.as_str());
        let served = match cli.strategy {
            Some(strategy) => dispatcher.fire_with(strategy, pizza, order).await?,
            None => dispatcher.fire(pizza, order).await?,
        };

        let toppings = serde_json::to_string(&served.toppings())?;
        info!(pizza = pizza.as_str(), "After emitting");
        println!("{pizza}\n  - {}\n  - {toppings}", served.ingredients);
    }

    Ok(())
}
