// asyncpipe/examples/basic_pipe.rs

use asyncpipe::{map_step, pipe, step_fn, sync_step, Signal};
use tracing::info;

// 1. One struct per stage of the context. Each step turns one into the next.
#[derive(Debug)]
struct Order {
  quantity: u32,
  unit_price_cents: u32,
}

#[derive(Debug)]
struct PricedOrder {
  order: Order,
  subtotal_cents: u32,
}

#[derive(Debug)]
struct Receipt {
  total_cents: u32,
  summary: String,
}

#[tokio::main]
async fn main() -> Result<(), Signal> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Basic Pipe Example ---");

  // 2. Compose once.
  let checkout = pipe![
    sync_step(|order: Order| {
      if order.quantity == 0 {
        return Err(Signal::bad_request("quantity must be positive"));
      }
      Ok(order)
    }),
    map_step::<_, Signal>(|order: Order| PricedOrder {
      subtotal_cents: order.quantity * order.unit_price_cents,
      order,
    }),
    step_fn(|priced: PricedOrder| async move {
      // Stand-in for an async tax lookup.
      tokio::task::yield_now().await;
      let total_cents = priced.subtotal_cents + priced.subtotal_cents / 10;
      Ok::<_, Signal>(Receipt {
        total_cents,
        summary: format!("{} x {}c", priced.order.quantity, priced.order.unit_price_cents),
      })
    }),
  ];
  info!(num_steps = checkout.len(), "Pipe composed.");

  // 3. Run many times with fresh input.
  let receipt = checkout
    .run(Order {
      quantity: 3,
      unit_price_cents: 500,
    })
    .await?;
  info!(?receipt, "First order priced.");
  assert_eq!(receipt.total_cents, 1650);

  match checkout
    .run(Order {
      quantity: 0,
      unit_price_cents: 500,
    })
    .await
  {
    Err(signal) => info!(status = signal.status(), %signal, "Second order rejected as expected."),
    Ok(receipt) => info!(?receipt, "Unexpected success."),
  }

  info!("--- Basic Pipe Example Finished ---");
  Ok(())
}
