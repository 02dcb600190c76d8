//! Demo: fills a cart, checks out, and follows the simulated order until it
//! is delivered and evicted.
//!
//! Without `ORDER_SIM_CONFIG` the clock runs [`DEMO_CLOCK_SPEED`] times faster
//! than real time so the whole thirty-minute timeline plays out in seconds.

use order_sim::config::{AppConfig, CONFIG_ENV};
use order_sim::lifecycle::{setup_tracing, MarketplaceSystem};
use order_sim::model::{ItemType, LineKey, OrderEvent, SellableItem, UserRef};
use order_sim::simulation::eta_minutes;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, Instrument};

const DEMO_CLOCK_SPEED: f64 = 120.0;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let mut config = AppConfig::from_env().map_err(|e| e.to_string())?;
    if std::env::var_os(CONFIG_ENV).is_none() {
        config.simulation.clock_speed = DEMO_CLOCK_SPEED;
        config.simulation.tick_interval_ms = 250;
        config.simulation.seed = Some(7);
    }

    info!(speed = config.simulation.clock_speed, "Starting marketplace demo");
    let system = MarketplaceSystem::new(&config).map_err(|e| e.to_string())?;

    let cart_sub = system.cart.subscribe(|lines| {
        let count: u32 = lines.iter().map(|line| line.quantity).sum();
        let subtotal: f64 = lines.iter().map(|line| line.line_total()).sum();
        info!(lines = lines.len(), count, subtotal, "Cart changed");
    });

    let span = tracing::info_span!("shopping");
    async {
        let dumplings = SellableItem::new("dish_12", "Pork & Chive Dumplings", 12.5)
            .with_photo("https://images.example.com/dishes/dish_12.jpg");
        let ramen = SellableItem::new("dish_7", "Tonkotsu Ramen", 16.0);
        let class = SellableItem::new("class_3", "Hand-pulled Noodle Class", 45.0);

        system.cart.add_item(dumplings.clone(), 1, ItemType::Dish);
        system.cart.add_item(ramen, 2, ItemType::Dish);
        system.cart.add_item(dumplings, 1, ItemType::Dish);
        system.cart.add_item(class, 1, ItemType::Class);
        system
            .cart
            .update_quantity(&LineKey::new("dish_7", ItemType::Dish), 1);
    }
    .instrument(span)
    .await;

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let order_sub = system.simulation.subscribe_all(move |event: &OrderEvent| {
        let _ = events_tx.send(event.clone());
    });

    let order = system
        .checkout(UserRef::new("user_1", "Alice"))
        .await
        .map_err(|e| e.to_string())?;
    info!(order_id = %order.id, total = order.total, chef = %order.chef.name, "Order placed");

    let route = *system.route();
    let follow = async {
        while let Some(event) = events_rx.recv().await {
            if event.order_id() != order.id {
                continue;
            }
            match &event {
                OrderEvent::Created(_) => {}
                OrderEvent::Advanced { order, .. } => {
                    let now = system.clock().now();
                    let position = order.driver_location(now, &route);
                    if order.status().is_terminal() {
                        info!(order_id = %order.id, "Arrived at the customer");
                    }
                    info!(
                        status = %order.status(),
                        eta_min = eta_minutes(order, now, &route),
                        lat = position.lat,
                        lng = position.lng,
                        "Tracking"
                    );
                }
                OrderEvent::Evicted { .. } => break,
            }
        }
    };

    if tokio::time::timeout(Duration::from_secs(120), follow).await.is_err() {
        error!(order_id = %order.id, "Order did not finish in time");
    }

    order_sub.unsubscribe();
    cart_sub.unsubscribe();

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Demo completed successfully");
    Ok(())
}
