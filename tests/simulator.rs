use evotrade::engines::evaluation::OrderSimulator;
use evotrade::engines::generation::operators::tune;
use evotrade::engines::generation::Order;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn prices() -> Vec<f64> {
    vec![120.0, 110.0, 100.0, 105.0, 130.0, 150.0, 140.0, 90.0]
}

#[test]
fn test_round_trip_realises_the_spread() {
    let simulator = OrderSimulator::new(1000.0);
    let outcome = simulator.run(&[2, 5], &prices());

    assert_eq!(outcome.sum, 1050.0);
    assert!(!outcome.open_position);
    assert_eq!(outcome.skipped, 0);
}

#[test]
fn test_unmatched_buy_keeps_its_cost() {
    let simulator = OrderSimulator::new(1000.0);
    let outcome = simulator.run(&[2, 5, 7], &prices());

    assert_eq!(outcome.sum, 1050.0 - 90.0);
    assert!(outcome.open_position);
}

#[test]
fn test_out_of_range_ticks_do_not_flip_the_position() {
    let simulator = OrderSimulator::new(1000.0);
    let outcome = simulator.run(&[2, 40, 5], &prices());

    assert_eq!(outcome.sum, 1050.0);
    assert_eq!(outcome.skipped, 1);
}

#[test]
fn test_replay_is_deterministic_and_leaves_prices_alone() {
    let simulator = OrderSimulator::new(500.0);
    let series = prices();
    let before = series.clone();

    let first = simulator.run(&[1, 4, 6, 7], &series);
    let second = simulator.run(&[1, 4, 6, 7], &series);

    assert_eq!(first, second);
    assert_eq!(series, before);
}

#[test]
fn test_down_variant_sums_every_cost() {
    let simulator = OrderSimulator::new(1000.0);
    let outcome = simulator.run_down(&[2, 5], &prices());
    assert_eq!(outcome.sum, -250.0);
}

#[test]
fn test_tuning_never_lowers_the_replay() {
    let simulator = OrderSimulator::new(1000.0);
    let series = prices();
    let mut order = Order::new(vec![3, 4]);
    let before = simulator.run(&order.trades, &series).sum;

    let mut rng = StdRng::seed_from_u64(11);
    tune(&mut order, &simulator, &series, series.len(), 200, &mut rng);

    assert!(order.sum >= before);
    assert!(order.is_valid(series.len()));
    assert_eq!(simulator.run(&order.trades, &series).sum, order.sum);
}
