extern crate image;
extern crate mandelpool;

use image::Rgb;
use mandelpool::{
    render, render_serial, IntegralPlane, Interaction, Pixel, RenderConfig, RenderError,
    ViewChange, ViewState, ZOOM_FACTOR,
};

fn small() -> RenderConfig {
    RenderConfig {
        plane: IntegralPlane(48, 32),
        view: ViewState::default(),
        workers: 5,
        max_iterations: 96,
    }
}

#[test]
fn zooming_mid_render_draws_only_the_new_view() {
    let config = small();
    let click = Pixel(10, 20);
    let interactions = [Interaction {
        after_rows: 6,
        change: ViewChange::Zoom(click),
    }];
    let image = render(&config, &interactions).unwrap();

    let expected = RenderConfig {
        view: config.view.zoom(&click, &config.plane, ZOOM_FACTOR),
        ..config
    };
    assert_eq!(image.into_raw(), render_serial(&expected).unwrap().into_raw());
}

#[test]
fn several_changes_in_a_row() {
    let config = small();
    let interactions = [
        Interaction {
            after_rows: 3,
            change: ViewChange::Zoom(Pixel(24, 16)),
        },
        Interaction {
            after_rows: 1,
            change: ViewChange::Resize(IntegralPlane(40, 20)),
        },
        Interaction {
            after_rows: 10,
            change: ViewChange::Zoom(Pixel(5, 5)),
        },
    ];
    let image = render(&config, &interactions).unwrap();
    assert_eq!(image.dimensions(), (40, 20));

    let plane = IntegralPlane(40, 20);
    let view = config
        .view
        .zoom(&Pixel(24, 16), &config.plane, ZOOM_FACTOR)
        .fit(&plane)
        .zoom(&Pixel(5, 5), &plane, ZOOM_FACTOR);
    let expected = RenderConfig {
        plane,
        view,
        ..config
    };
    assert_eq!(image.into_raw(), render_serial(&expected).unwrap().into_raw());
}

#[test]
fn explicit_bounds_replace_the_view() {
    let config = small();
    let view = ViewState {
        r_min: -0.75,
        r_max: -0.25,
        i_min: 0.0,
        i_max: 0.5,
    };
    let interactions = [Interaction {
        after_rows: 2,
        change: ViewChange::Bounds(view),
    }];
    let image = render(&config, &interactions).unwrap();
    let expected = render_serial(&RenderConfig { view, ..config }).unwrap();
    assert_eq!(image.into_raw(), expected.into_raw());
}

#[test]
fn interactions_that_never_fire_are_ignored() {
    let config = small();
    let interactions = [Interaction {
        after_rows: 1000,
        change: ViewChange::Zoom(Pixel(0, 0)),
    }];
    let image = render(&config, &interactions).unwrap();
    assert_eq!(image.into_raw(), render_serial(&config).unwrap().into_raw());
}

#[test]
fn the_whole_set_is_black_in_the_middle() {
    let config = RenderConfig {
        plane: IntegralPlane(40, 30),
        ..small()
    };
    let image = render(&config, &[]).unwrap();
    // Column 15, row 15 is -1 + 0i.
    assert_eq!(*image.get_pixel(15, 15), Rgb([0, 0, 0]));
    assert_ne!(*image.get_pixel(0, 0), Rgb([0, 0, 0]));
}

#[test]
fn bad_configs_are_refused() {
    let config = RenderConfig {
        workers: 0,
        ..small()
    };
    match render(&config, &[]) {
        Err(RenderError::NoWorkers) => (),
        other => panic!("expected NoWorkers, got {:?}", other.map(|i| i.dimensions())),
    }
}
