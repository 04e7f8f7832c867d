use lineage::{Diagram, GenerateOpts, MergePlacement, MergeSpec, Point, to_svg_document};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut diagram = Diagram::new(1200.0, 400.0, 200)?;
    let lane = diagram.add_bundle(Point::new(0.0, 200.0), 6.0)?;
    diagram.bundle_mut(lane)?.shift_to(600.0, 750.0, 260.0)?;

    let red = diagram.add_lineage("#cc3311", Point::new(0.0, 60.0), 12.0)?;
    let blue = diagram.add_lineage("#0077bb", Point::new(0.0, 340.0), 18.0)?;
    let green = diagram.add_lineage_in_bundle("#009988", lane, 0.0, 14.0, 0.0)?;

    diagram.lineage_mut(red)?.join(200.0, 300.0, lane)?;
    diagram
        .lineage_mut(blue)?
        .join(250.0, 350.0, lane)?
        .leave(850.0, 950.0, lane, 360.0)?;

    let merged = diagram.merge(&MergeSpec {
        parents: vec![red, green],
        from_x: 950.0,
        to_x: 1050.0,
        color: "#ee7733".into(),
        width: 30.0,
        placement: MergePlacement::InBundle { bundle: lane },
    })?;
    println!("merged into {}", merged.child);

    let generated = diagram.generate(&GenerateOpts {
        parallel: true,
        threads: None,
    })?;
    for l in &generated.lineages {
        println!("{} {:?}", l.id, l.segments);
    }
    print!("{}", to_svg_document(&diagram, &generated));
    Ok(())
}
