use std::env;

use anyhow::{Context, bail};
use indicatif::ProgressBar;
use rayon::prelude::*;

use minibvh::{
    Bvh, Camera, PlocConfig, SahConfig,
    geometry::{Aabb, Triangle, WorldPoint, WorldVector},
    obj, ppm,
};

const WIDTH: usize = 1024;
const HEIGHT: usize = 1024;
const OUTPUT_FILE: &str = "out.ppm";

fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let Some(input) = args.next() else {
        bail!("missing input OBJ file");
    };
    let use_ploc = match args.next().as_deref() {
        None => false,
        Some("--ploc") => true,
        Some(other) => bail!("unknown argument {other:?} (expected --ploc)"),
    };

    let triangles =
        obj::load_from_path(&input).with_context(|| format!("failed to load {input}"))?;
    if triangles.is_empty() {
        bail!("no triangle was found in {input}");
    }
    println!("Loaded file with {} triangle(s)", triangles.len());

    let bboxes: Vec<Aabb> = triangles.iter().map(Triangle::aabb).collect();
    let centers: Vec<WorldPoint> = triangles.iter().map(Triangle::centroid).collect();
    let bvh = if use_ploc {
        Bvh::build_ploc(&bboxes, &centers, &PlocConfig::default())
    } else {
        Bvh::build_binned_sah(&bboxes, &centers, &SahConfig::default())
    };
    println!("Built BVH with {} node(s), depth {}", bvh.nodes.len(), bvh.depth());
    bvh.print_statistics();

    let camera = Camera::builder()
        .center(WorldPoint::new(0.0, 1.0, 3.0))
        .forward(WorldVector::new(0.0, 0.0, -1.0))
        .up(WorldVector::new(0.0, 1.0, 0.0))
        .build();

    // Rows are independent: the tree is read-only and every ray is local to
    // its pixel. Row 0 is the bottom of the image; the PPM writer flips.
    let bar = ProgressBar::new(HEIGHT as u64);
    let mut image = vec![0u8; WIDTH * HEIGHT * 3];
    let intersections: usize = image
        .par_chunks_mut(WIDTH * 3)
        .enumerate()
        .map(|(y, row)| {
            let mut row_hits = 0;
            for x in 0..WIDTH {
                let u = 2.0 * x as f32 / WIDTH as f32 - 1.0;
                let v = 2.0 * y as f32 / HEIGHT as f32 - 1.0;
                let mut ray = camera.ray(u, v);
                let hit = bvh.traverse(&mut ray, &triangles);
                row_hits += usize::from(hit.is_some());
                row[x * 3..x * 3 + 3].copy_from_slice(&ppm::shade(hit));
            }
            bar.inc(1);
            row_hits
        })
        .sum();
    bar.finish_and_clear();
    println!("{intersections} intersection(s) found");

    ppm::save(OUTPUT_FILE, WIDTH, HEIGHT, &image)?;
    println!("Image saved as {OUTPUT_FILE}");
    Ok(())
}
