//! Complete workflow demonstration for voronoi_cell_map
//!
//! Run with `RUST_LOG=debug` to see the per-stage log lines.

use voronoi_cell_map::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== voronoi_cell_map Demo ===\n");

    // Step 1: Configure generator
    println!("Step 1: Configuring generator...");
    let config = MapConfigBuilder::new()
        .max_sites(20)?
        .min_site_distance(0.45)?
        .gap(0.05)?
        .build()?;
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);

    println!("  Seed: {}", seed);
    println!("  Max sites: {}", config.max_sites);
    println!("  Gap: {} (adjacency epsilon {})", config.gap, config.adjacency_epsilon());

    // Step 2: Generate map
    println!("\nStep 2: Generating map...");
    let boundary = BoundaryShape::rectangle(Vec2::splat(-5.0), Vec2::splat(5.0));
    let map = MapGenerator::new(config).generate(seed, &boundary)?;
    println!("  Generated {} cells", map.cell_count());
    println!("  Start cell: {}", map.start_cell());

    // Step 3: Inspect cells
    println!("\nStep 3: Cells:");
    for cell in map.graph() {
        println!(
            "  Cell {:2}: {:2} vertices, area {:5.2}, neighbors {:?}{}",
            cell.id,
            cell.vertex_count(),
            cell.area(),
            cell.neighbors,
            if cell.is_start { " (start)" } else { "" }
        );
    }
    println!("  Connected: {}", map.graph().is_connected());

    // Step 4: Query spatial index
    #[cfg(feature = "spatial-index")]
    {
        println!("\nStep 4: Spatial queries:");
        for position in [Vec2::ZERO, Vec2::new(3.0, -2.0), Vec2::new(9.0, 9.0)] {
            match map.find_cell_at(position) {
                Some(id) => println!("  Position {:?} -> Cell {}", position, id),
                None => println!("  Position {:?} -> no cell", position),
            }
        }
    }

    // Step 5: Explore greedily, always opening the lowest available ID
    println!("\nStep 5: Exploring...");
    let mut exploration = Exploration::new(map.graph().clone());
    let mut path = vec![exploration.current()];
    while let Some(&next) = exploration.available_cells().first() {
        exploration.select(next)?;
        path.push(next);
    }
    println!("  Path: {:?}", path);
    println!(
        "  Opened {}/{} cells{}",
        exploration.opened_count(),
        map.cell_count(),
        if exploration.is_complete() { ", map complete!" } else { ", dead end" }
    );

    println!("\n=== Demo Complete ===");
    Ok(())
}
