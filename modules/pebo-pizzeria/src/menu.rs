//! Which actions make which pizza.

use pebo::{from_async_fn, from_fn, Dispatcher, PromiseProvider};

use crate::actions::{
    add_basil, add_ham, add_mozzarella, add_mushrooms, add_tomatoes, Order, Pizzaiolo,
};

pub const MARGHERITA: &str = "margherita";
pub const REGINA: &str = "regina";

pub const MENU: [&str; 2] = [MARGHERITA, REGINA];

pub fn is_on_menu(pizza: &str) -> bool {
    MENU.contains(&pizza)
}

/// Register every pizza's actions, in the order they go on the dough.
pub fn register<P: PromiseProvider>(dispatcher: &mut Dispatcher<Order, Pizzaiolo, P>) {
    dispatcher
        .register(MARGHERITA, from_fn(add_mozzarella))
        .register(MARGHERITA, from_async_fn(add_tomatoes))
        .register(MARGHERITA, from_fn(add_basil))
        .register(REGINA, from_fn(add_mozzarella))
        .register(REGINA, from_async_fn(add_tomatoes))
        .register(REGINA, from_async_fn(add_ham))
        .register(REGINA, from_async_fn(add_mushrooms));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pebo::{FireStrategy, InlinePromises};

    fn kitchen() -> Dispatcher<Order, Pizzaiolo> {
        let mut dispatcher = Dispatcher::with_owner(Pizzaiolo::new("Mario"));
        register(&mut dispatcher);
        dispatcher
    }

    #[test]
    fn menu_lists_registered_pizzas() {
        let dispatcher = kitchen();
        assert_eq!(dispatcher.listener_count(MARGHERITA), 3);
        assert_eq!(dispatcher.listener_count(REGINA), 4);
        assert!(is_on_menu("regina"));
        assert!(!is_on_menu("calzone"));
    }

    #[tokio::test]
    async fn propagating_margherita() {
        let served = kitchen()
            .fire_sequentially_propagating_responses(MARGHERITA, Order::new("Ingredients:"))
            .await
            .unwrap();

        assert_eq!(served.ingredients, "Ingredients: - mozzarella - tomato - basil");
        assert_eq!(served.toppings(), vec!["mozzarella", "tomatoes", "basil"]);
    }

    #[tokio::test]
    async fn sequential_margherita_keeps_ingredients_line() {
        let served = kitchen()
            .fire_sequentially(MARGHERITA, Order::new("Ingredients:"))
            .await
            .unwrap();

        assert_eq!(served.ingredients, "Ingredients:");
        assert_eq!(served.toppings(), vec!["mozzarella", "tomatoes", "basil"]);
    }

    #[tokio::test]
    async fn concurrent_regina_lands_toppings_by_speed() {
        let served = kitchen()
            .fire_concurrently(REGINA, Order::new("Ingredients:"))
            .await
            .unwrap();

        assert_eq!(served.ingredients, "Ingredients:");
        let toppings = served.toppings();
        assert_eq!(toppings.len(), 4);
        assert_eq!(toppings[0], "mozzarella");
        // tomatoes and mushrooms share a delay; ham is always last
        assert_eq!(toppings[3], "ham");
    }

    #[tokio::test]
    async fn inline_provider_serves_regina_too() {
        let served = kitchen()
            .with_provider(InlinePromises)
            .with_default_strategy(FireStrategy::SequentialPropagating)
            .fire(REGINA, Order::new("Ingredients:"))
            .await
            .unwrap();

        assert_eq!(
            served.ingredients,
            "Ingredients: - mozzarella - tomato - ham - mushrooms"
        );
    }
}
