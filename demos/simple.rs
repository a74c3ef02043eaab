//! Build `f = (a + b) * (c * d)`, dump the unique table and write `bdd.dot`.
//!
//! ```bash
//! cargo run --example simple
//! dot -Tpng bdd.dot -o bdd.png
//! ```

use vds_bdd::manager::Manager;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let bdd = Manager::new();

    let a = bdd.mk_var("A");
    let b = bdd.mk_var("B");
    let c = bdd.mk_var("C");
    let d = bdd.mk_var("D");

    let f = (a + b) * (c * d);
    println!("f = {:?}", f);
    println!("bdd = {:?}", bdd);

    bdd.dump();

    bdd.write_dot("bdd.dot", f.id())?;
    println!("Written bdd.dot");
    print!("{}", bdd.to_text(f.id()));

    Ok(())
}
