//! Build and solve the reference network: a 12 V supply driving R1 in
//! series with the R2 || R3 bank, then print every resistor's labels.
//!
//! Run with `cargo run --example reference_network`.

use ohmic::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut b = CircuitBuilder::with_title("reference network");
    let n1 = b.add_named_node("n1");
    let n2 = b.add_named_node("n2");
    let n3 = b.add_named_node("n3");
    b.add_named_resistor("R1", n1, n2, 100.0)?;
    b.add_named_resistor("R2", n2, n3, 50.0)?;
    b.add_named_resistor("R3", n2, n3, 150.0)?;
    b.supply(12.0, n1, n3)?;

    let solution = solve_network(b.build()?)?;

    println!(
        "reduced in {} steps to {:.2} ohm, supply current {:.4} A\n",
        solution.steps(),
        solution.equivalent_resistance(),
        solution.supply_current()
    );
    print!("{}", solution.root().summary());
    println!("\ntotal power: {:.4} W", solution.total_power());
    Ok(())
}
