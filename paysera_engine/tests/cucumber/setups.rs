use cucumber::given;
use paysera_engine::test_utils::sample_order;

use crate::cucumber::{PaymentSystem, PayseraWorld};

#[given("a fresh install")]
async fn fresh_install(world: &mut PayseraWorld) {
    world.system = Some(PaymentSystem::new());
}

#[given(expr = "an order {word} for {int} cents")]
async fn an_order(world: &mut PayseraWorld, number: String, total: i64) {
    let inserted = world.store().insert(sample_order(&number, total)).await;
    assert!(inserted, "Order {number} already exists");
}
