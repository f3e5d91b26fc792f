//! Pizza actions. Each one adds a topping to the shared pizza and, when
//! its reply is propagated, to the ingredients line.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use tracing::info;

/// The owner every action can read: whoever is making the pizza.
#[derive(Debug, Clone)]
pub struct Pizzaiolo {
    pub name: String,
}

impl Pizzaiolo {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Payload fired with each pizza event.
///
/// `ingredients` is a plain value: listeners get their own copy.
/// `pizza` is shared by every copy of the order.
#[derive(Debug, Clone)]
pub struct Order {
    pub ingredients: String,
    pub pizza: Arc<Mutex<Vec<String>>>,
}

impl Order {
    pub fn new(ingredients: impl Into<String>) -> Self {
        Self {
            ingredients: ingredients.into(),
            pizza: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn toppings(&self) -> Vec<String> {
        self.pizza
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn add(mut self, ingredient: &str, topping: &str) -> Self {
        self.ingredients.push_str(" - ");
        self.ingredients.push_str(ingredient);
        self.pizza
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(topping.to_string());
        self
    }
}

const TOMATOES_DELAY: Duration = Duration::from_millis(100);
const HAM_DELAY: Duration = Duration::from_millis(200);
const MUSHROOMS_DELAY: Duration = Duration::from_millis(100);

pub fn add_mozzarella(chef: &Pizzaiolo, order: Order) -> Result<Option<Order>> {
    info!(pizzaiolo = chef.name.as_str(), "Inside action add_mozzarella()");
    Ok(Some(order.add("mozzarella", "mozzarella")))
}

pub fn add_basil(chef: &Pizzaiolo, order: Order) -> Result<Option<Order>> {
    info!(pizzaiolo = chef.name.as_str(), "Inside action add_basil()");
    Ok(Some(order.add("basil", "basil")))
}

pub fn add_tomatoes(
    chef: &Pizzaiolo,
    order: Order,
) -> impl Future<Output = Result<Option<Order>>> + Send + 'static {
    delayed(chef, order, TOMATOES_DELAY, "add_tomatoes", "tomato", "tomatoes")
}

pub fn add_ham(
    chef: &Pizzaiolo,
    order: Order,
) -> impl Future<Output = Result<Option<Order>>> + Send + 'static {
    delayed(chef, order, HAM_DELAY, "add_ham", "ham", "ham")
}

pub fn add_mushrooms(
    chef: &Pizzaiolo,
    order: Order,
) -> impl Future<Output = Result<Option<Order>>> + Send + 'static {
    delayed(chef, order, MUSHROOMS_DELAY, "add_mushrooms", "mushrooms", "mushrooms")
}

fn delayed(
    chef: &Pizzaiolo,
    order: Order,
    delay: Duration,
    action: &'static str,
    ingredient: &'static str,
    topping: &'static str,
) -> impl Future<Output = Result<Option<Order>>> + Send + 'static {
    let name = chef.name.clone();
    async move {
        tokio::time::sleep(delay).await;
        info!(pizzaiolo = name.as_str(), action, "Inside async action");
        Ok::<_, anyhow::Error>(Some(order.add(ingredient, topping)))
    }
}
