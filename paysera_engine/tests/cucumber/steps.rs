use cucumber::{then, when};
use paysera_common::MinorUnits;
use paysera_engine::{
    codec::{decode_body, parse_query},
    db_types::{OrderState, PaymentState},
    test_utils::payment_notification,
    traits::OrderStore,
    ReconciliationOutcome,
};

use crate::cucumber::PayseraWorld;

#[when(expr = "the buyer checks out order {word}")]
async fn checkout(world: &mut PayseraWorld, number: String) {
    let result = world.api().checkout(&number).await;
    world.last_checkout = Some(result);
}

#[when(expr = "Paysera reports a payment of {int} cents for order {word}")]
async fn paysera_callback(world: &mut PayseraWorld, amount: i64, number: String) {
    let notification = payment_notification("12", &number, amount);
    let result = world.api().process_callback(&notification).await;
    world.last_callback = Some(result);
}

#[when(expr = "project {word} reports a payment of {int} cents for order {word}")]
async fn foreign_project_callback(world: &mut PayseraWorld, project: String, amount: i64, number: String) {
    let notification = payment_notification(&project, &number, amount);
    let result = world.api().process_callback(&notification).await;
    world.last_callback = Some(result);
}

#[when(expr = "a forged callback reports a payment of {int} cents for order {word}")]
async fn forged_callback(world: &mut PayseraWorld, amount: i64, number: String) {
    let mut notification = payment_notification("12", &number, amount);
    notification.ss1 = "0".repeat(32);
    let result = world.api().process_callback(&notification).await;
    world.last_callback = Some(result);
}

#[when(expr = "the buyer returns from paying {int} cents for order {word}")]
async fn buyer_returns(world: &mut PayseraWorld, amount: i64, number: String) {
    let notification = payment_notification("12", &number, amount);
    let result = world.api().confirm(&notification).await;
    world.last_confirmation = Some(result);
}

#[then(expr = "the callback is acknowledged with {string}")]
async fn callback_acknowledged(world: &mut PayseraWorld, ack: String) {
    match world.last_callback() {
        Ok(result) => assert_eq!(result.acknowledgement(), ack),
        Err(e) => panic!("Callback failed: {e}"),
    }
}

#[then(expr = "the callback fails with {string}")]
async fn callback_fails(world: &mut PayseraWorld, message: String) {
    match world.last_callback() {
        Ok(result) => panic!("Expected the callback to fail, but it succeeded: {result:?}"),
        Err(e) => assert_eq!(e.to_string(), message),
    }
}

#[then(expr = "the outcome is {word}")]
async fn outcome_is(world: &mut PayseraWorld, expected: String) {
    let outcome = &world.last_callback().as_ref().expect("Callback failed").outcome;
    let matches = match expected.as_str() {
        "PaidExact" => matches!(outcome, ReconciliationOutcome::PaidExact),
        "PaidWithCredit" => matches!(outcome, ReconciliationOutcome::PaidWithCredit(_)),
        "AlreadySettled" => matches!(outcome, ReconciliationOutcome::AlreadySettled(_)),
        "Rejected" => matches!(outcome, ReconciliationOutcome::Rejected(_)),
        other => panic!("Unknown outcome {other}"),
    };
    assert!(matches, "Expected outcome {expected}, got {outcome:?}");
}

#[then(expr = "order {word} has payment state {word}")]
async fn order_payment_state(world: &mut PayseraWorld, number: String, state: String) {
    let order = world.store().fetch_order(&number).await.expect("Store error").expect("Order not found");
    let expected = match state.as_str() {
        "paid" => PaymentState::Paid,
        "credit_owed" => PaymentState::CreditOwed,
        "balance_due" => PaymentState::BalanceDue,
        other => panic!("Unknown payment state {other}"),
    };
    assert_eq!(order.payment_state, expected);
}

#[then(expr = "order {word} is complete")]
async fn order_complete(world: &mut PayseraWorld, number: String) {
    let order = world.store().fetch_order(&number).await.expect("Store error").expect("Order not found");
    assert_eq!(order.state, OrderState::Complete);
}

#[then(expr = "order {word} is awaiting payment")]
async fn order_awaiting_payment(world: &mut PayseraWorld, number: String) {
    let order = world.store().fetch_order(&number).await.expect("Store error").expect("Order not found");
    assert_eq!(order.state, OrderState::Payment);
}

#[then(expr = "order {word} has {int} payment(s)")]
async fn payment_count(world: &mut PayseraWorld, number: String, count: usize) {
    assert_eq!(world.store().payments_for(&number).await.len(), count);
}

#[then(expr = "the payment for order {word} is {int} cents and completed")]
async fn payment_amount(world: &mut PayseraWorld, number: String, amount: i64) {
    let payments = world.store().payments_for(&number).await;
    let payment = payments.last().expect("No payment recorded");
    assert_eq!(payment.amount, MinorUnits::from(amount));
    assert!(payment.is_completed());
}

#[then(expr = "the buyer is told the order was processed")]
async fn confirmation_ok(world: &mut PayseraWorld) {
    let confirmation = world.last_confirmation.as_ref().expect("The buyer has not returned");
    assert!(confirmation.is_processed(), "Expected a processed order, got {confirmation:?}");
}

#[then(expr = "the buyer is told the payment could not be processed")]
async fn confirmation_failed(world: &mut PayseraWorld) {
    let confirmation = world.last_confirmation.as_ref().expect("The buyer has not returned");
    assert!(!confirmation.is_processed(), "Expected a failed confirmation, got {confirmation:?}");
}

#[then(expr = "the buyer is sent to Paysera with field {word} set to {string}")]
async fn redirect_field(world: &mut PayseraWorld, field: String, value: String) {
    let request = world.last_checkout.as_ref().expect("No checkout").as_ref().expect("Checkout failed");
    let query = request.redirect_url.split_once('?').map(|(_, q)| q).expect("Redirect has no query");
    let params = parse_query(query).expect("Redirect query is malformed");
    let data = String::from_utf8(decode_body(&params["data"]).expect("Bad data")).expect("Data is not UTF-8");
    let fields = parse_query(&data).expect("Signed fields are malformed");
    assert_eq!(fields.get(&field), Some(&value));
}

#[then(expr = "checkout fails with {string}")]
async fn checkout_fails(world: &mut PayseraWorld, message: String) {
    match world.last_checkout.as_ref().expect("No checkout") {
        Ok(request) => panic!("Expected checkout to fail, got {}", request.redirect_url),
        Err(e) => assert_eq!(e.to_string(), message),
    }
}
