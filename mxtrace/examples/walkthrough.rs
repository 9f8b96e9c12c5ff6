//! Walk through every operation on a small classroom example

use std::time::Instant;

use mxtrace::{compatibility_hint, Matrix, Operation, Session, SessionConfig};

#[tokio::main]
async fn main() -> mxtrace::Result<()> {
    let session = Session::local(SessionConfig::default());

    let a = Matrix::from([[1.0, 2.0], [3.0, 4.0]]);
    let b = Matrix::from([[5.0, 6.0], [7.0, 8.0]]);
    println!("{}\n", compatibility_hint(a.dimensions(), b.dimensions()));

    for op in [Operation::Add, Operation::Subtract, Operation::Multiply] {
        let start = Instant::now();
        let outcome = session.compute(op, &a, Some(&b)).await;
        println!("{}", outcome.steps());
        println!("   ({:.3}ms)\n", start.elapsed().as_secs_f64() * 1000.0);
    }

    let m = Matrix::from([[2.0, 1.0, -1.0], [-3.0, -1.0, 2.0], [-2.0, 1.0, 2.0]]);
    let start = Instant::now();
    let c = session.try_compute(Operation::ReduceToRref, &m, None).await?;
    println!("{}", c.trace());
    println!(
        "   {} row operations in {:.3}ms\n",
        c.trace().steps().len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    // incompatible shapes: an error and the placeholder trace, no partial result
    let outcome = session
        .compute(Operation::Multiply, &Matrix::zeros(2, 3), Some(&b))
        .await;
    if let Some(error) = outcome.error() {
        println!("Error: {error}");
    }
    println!("{}", outcome.steps());

    Ok(())
}
