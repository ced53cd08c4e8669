use dashchart::ChartError;
use dashchart::core::{Insets, Rect, Size, compute_frames};

#[test]
fn frames_nest_view_axis_and_data() {
    let frames = compute_frames(
        Size::new(400.0, 300.0),
        Insets::default(),
        Insets::new(10.0, 20.0, 30.0, 40.0),
        Insets::uniform(5.0),
    )
    .expect("valid frames");

    assert_eq!(
        frames.view,
        Rect {
            top: 0.0,
            left: 0.0,
            bottom: 300.0,
            right: 400.0,
            width: 400.0,
            height: 300.0,
        }
    );
    assert_eq!(
        frames.axis,
        Rect {
            top: 10.0,
            left: 20.0,
            bottom: 270.0,
            right: 360.0,
            width: 340.0,
            height: 260.0,
        }
    );
    assert_eq!(
        frames.data,
        Rect {
            top: 15.0,
            left: 25.0,
            bottom: 265.0,
            right: 355.0,
            width: 330.0,
            height: 250.0,
        }
    );
    assert!(frames.view.contains(frames.axis));
    assert!(frames.axis.contains(frames.data));
}

#[test]
fn position_offsets_the_view_but_keeps_the_outer_size() {
    let frames = compute_frames(
        Size::new(200.0, 100.0),
        Insets::new(5.0, 10.0, 0.0, 0.0),
        Insets::default(),
        Insets::default(),
    )
    .expect("valid frames");

    assert_eq!(frames.view.left, 10.0);
    assert_eq!(frames.view.top, 5.0);
    assert_eq!(frames.view.width, 200.0);
    assert_eq!(frames.axis.width, 190.0);
    assert_eq!(frames.axis.height, 95.0);
}

#[test]
fn margins_wider_than_the_chart_are_rejected() {
    let err = compute_frames(
        Size::new(100.0, 100.0),
        Insets::default(),
        Insets::new(0.0, 60.0, 0.0, 60.0),
        Insets::default(),
    )
    .expect_err("axis frame collapses");

    assert!(matches!(err, ChartError::InvalidFrame { frame: "axis", .. }));
}

#[test]
fn padding_that_swallows_the_axis_frame_is_rejected() {
    let err = compute_frames(
        Size::new(100.0, 100.0),
        Insets::default(),
        Insets::uniform(10.0),
        Insets::new(40.0, 0.0, 40.0, 0.0),
    )
    .expect_err("data frame collapses");

    assert!(matches!(err, ChartError::InvalidFrame { frame: "data", .. }));
}

#[test]
fn zero_size_and_negative_insets_are_rejected() {
    let zero = compute_frames(
        Size::new(0.0, 100.0),
        Insets::default(),
        Insets::default(),
        Insets::default(),
    );
    assert!(matches!(zero, Err(ChartError::InvalidFrame { frame: "view", .. })));

    let negative = compute_frames(
        Size::new(100.0, 100.0),
        Insets::default(),
        Insets::new(-1.0, 0.0, 0.0, 0.0),
        Insets::default(),
    );
    assert!(matches!(negative, Err(ChartError::InvalidConfig(_))));
}

#[test]
fn rect_center_is_the_midpoint() {
    let frames = compute_frames(
        Size::new(300.0, 200.0),
        Insets::default(),
        Insets::new(20.0, 20.0, 20.0, 20.0),
        Insets::default(),
    )
    .expect("valid frames");

    assert_eq!(frames.axis.center(), (150.0, 100.0));
}
