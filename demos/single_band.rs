use lineage::{Diagram, GenerateOpts, Point};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut diagram = Diagram::new(400.0, 200.0, 100)?;
    let band = diagram.add_lineage("#4477aa", Point::new(0.0, 50.0), 10.0)?;
    diagram
        .lineage_mut(band)?
        .shift_to(100.0, 200.0, 150.0)?
        .scale_to(100.0, 200.0, 20.0)?;

    let generated = diagram.generate(&GenerateOpts::default())?;
    let outline = &generated.lineages[0].outline;
    println!(
        "{} upper / {} lower points",
        outline.upper.len(),
        outline.lower.len()
    );
    println!("{}", outline.to_svg_path_d());
    Ok(())
}
