//! Criterion microbenches for box CSV parsing and export rendering.
//!
//! Run with: `cargo bench`

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use leafcoco::ir::io_box_csv::{from_box_csv_slice, from_box_csv_str};
use leafcoco::ir::io_coco_json::to_coco_string;
use leafcoco::ir::{Annotation, BBoxXYWH, Category, Dataset, DatasetInfo, Image};

// One row per box, mixing valid rows with a degenerate and an unparsable one.
const BOX_CSV_FIXTURE: &str = "#item,x,y,width,height,label
0,12,18,80,64,2
1,100,40,32,32,2
2,0,0,0,0,2
3,5.5,7.25,120.5,98,3
4,oops,1,1,1,1
5,200,200,40,24,4
";

/// A document of `images` images with `per_image` boxes each.
fn synthetic_dataset(images: u64, per_image: u64) -> Dataset {
    let mut dataset = Dataset {
        info: DatasetInfo::for_split("grapes", "train"),
        categories: vec![
            Category::new(1i64, "healthy", "grape"),
            Category::new(2i64, "black_rot", "grape"),
        ],
        ..Default::default()
    };
    let mut next_annotation = 1u64;
    for id in 1..=images {
        dataset.images.push(Image::new(
            id,
            format!("grapes/healthy/images/{id:05}.jpg"),
            256,
            256,
        ));
        for k in 0..per_image {
            let offset = (k * 8) as f64;
            dataset.annotations.push(Annotation::new(
                next_annotation,
                id,
                1 + (k % 2) as i64,
                BBoxXYWH::new(offset, offset, 32.0, 48.0),
            ));
            next_annotation += 1;
        }
    }
    dataset
}

fn bench_box_csv_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("box_csv_parse");
    group.throughput(Throughput::Bytes(BOX_CSV_FIXTURE.len() as u64));

    group.bench_function("from_box_csv_str", |b| {
        b.iter(|| {
            let parsed = from_box_csv_str(black_box(BOX_CSV_FIXTURE)).unwrap();
            black_box(parsed)
        })
    });

    group.bench_function("from_box_csv_slice", |b| {
        b.iter(|| {
            let parsed = from_box_csv_slice(black_box(BOX_CSV_FIXTURE.as_bytes())).unwrap();
            black_box(parsed)
        })
    });

    group.finish();
}

/// Rendering cost of a split-sized document.
fn bench_export_render(c: &mut Criterion) {
    let dataset = synthetic_dataset(500, 3);

    let mut group = c.benchmark_group("export_render");
    group.throughput(Throughput::Elements(dataset.annotations.len() as u64));

    group.bench_function("to_coco_string", |b| {
        b.iter(|| {
            let json = to_coco_string(black_box(&dataset)).unwrap();
            black_box(json)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_box_csv_parse, bench_export_render);
criterion_main!(benches);
