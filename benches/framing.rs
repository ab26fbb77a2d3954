use criterion::{Criterion, criterion_group, criterion_main};
use glam::DVec3;
use warehouse_nav::camera::framing::{
    FitRect, RackShot, SlotShot, TopDownShot, fit_top_down, front_of_rack, three_quarter_slot_view,
};
use warehouse_nav::types::{BoundingBox, Facing, RackRecord};

fn bench_fit_top_down(c: &mut Criterion) {
    let rect = FitRect {
        center: DVec3::new(30.0, 0.0, 47.0),
        width: 60.0,
        length: 94.0,
    };
    let shot = TopDownShot {
        aspect_ratio: 1.6,
        ..TopDownShot::default()
    };

    c.bench_function("fit_top_down_bay", |b| {
        b.iter(|| fit_top_down(&rect, &shot));
    });
}

fn bench_rack_and_slot(c: &mut Criterion) {
    let rack = RackRecord {
        rack_ref: "18".into(),
        bay_id: "BAY_00_NW".into(),
        sections: vec!["A".into(), "B".into(), "C".into()],
        levels: 6,
        slot_count: 18,
        bounds: BoundingBox::from_center_size(DVec3::new(20.0, 9.0, 11.0), DVec3::new(32.0, 18.0, 2.0)),
        facing: Facing::Positive,
        facing_axis: DVec3::Z,
    };
    let rack_shot = RackShot::default();
    let slot_shot = SlotShot::default();

    c.bench_function("front_of_rack", |b| {
        b.iter(|| front_of_rack(&rack, &rack_shot));
    });

    c.bench_function("three_quarter_slot_view", |b| {
        b.iter(|| {
            three_quarter_slot_view(
                DVec3::new(6.0, 4.5, 11.0),
                DVec3::new(4.0, 3.0, 2.0),
                rack.facing_axis,
                &slot_shot,
            )
        });
    });
}

criterion_group!(benches, bench_fit_top_down, bench_rack_and_slot);
criterion_main!(benches);
