//! Example: waiting on timers from a plain `main`

use hang_around::time::{delay, resolve_after};
use hang_around::{AwaitError, async_run, await_future, current};
use std::time::Duration;

#[hang_around::main(name = "example-main")]
fn main() -> Result<(), AwaitError> {
    let context = current().map(|c| c.name().to_string());
    println!("running on {context:?}");

    let value = await_future(resolve_after(Duration::from_millis(100), 11))?;
    println!("resolved {value}");

    async_run(|| {
        await_future(delay(Duration::from_millis(10)))?;
        println!("background task done");
        Ok::<_, AwaitError>(())
    });

    // Give the background task time to finish before the process exits.
    await_future(delay(Duration::from_millis(50)))?;
    Ok(())
}
