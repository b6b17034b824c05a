use std::{cell::Cell, rc::Rc};

use tria::{
    app::App,
    event::{Event, Key},
    render::{Color, vertex::{Triangle, Vertex}},
};

fn flat(x: f32, y: f32, rgba: [f32; 4]) -> Vertex {
    Vertex::new([x, y, 0.0], rgba, [0.0, 0.0])
}

fn uv(x: f32, y: f32, u: f32, v: f32) -> Vertex {
    Vertex::new([x, y, 0.0], [1.0, 1.0, 1.0, 1.0], [u, v])
}

fn main() {
    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

    // hardcoded NDC geometry: two flat triangles & a textured quad
    let flat_batch = [
        Triangle::new(
            flat(0.3, -0.3, RED),
            flat(0.0, 0.3, RED),
            flat(-0.3, -0.3, RED),
        ),
        Triangle::new(
            flat(0.6, 0.3, GREEN),
            flat(0.9, 0.3, GREEN),
            flat(0.75, 0.6, GREEN),
        ),
    ];
    let quad_batch = [
        Triangle::new(
            uv(-0.1, 0.1, 1.0, 1.0),
            uv(-0.1, 0.4, 1.0, 0.0),
            uv(-0.4, 0.1, 0.0, 1.0),
        ),
        Triangle::new(
            uv(-0.4, 0.4, 0.0, 0.0),
            uv(-0.1, 0.4, 1.0, 0.0),
            uv(-0.4, 0.1, 0.0, 1.0),
        ),
    ];

    let checker = Rc::new(Cell::new(None));

    let loaded = checker.clone();
    App::init(move |ctx| {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/checker.png");
        match ctx.load_texture(path) {
            Ok(id) => loaded.set(Some(id)),
            Err(err) => log::error!("{err}"),
        }
    })
    .title("Tria Triangles")
    .size(800, 600)
    .run(move |ctx| {
        while let Some(event) = ctx.poll_event() {
            match event {
                Event::Quit | Event::KeyPressed(Key::Escape) => ctx.exit(),
                Event::MouseMotion { x, y } => log::debug!("mouse motion: {x} {y}"),
                Event::MouseClick { x, y } => log::info!("mouse click: {x} {y}"),
                Event::KeyPressed(key) => log::info!("key pressed: {key:?}"),
                Event::KeyReleased(key) => log::info!("key released: {key:?}"),
            }
        }

        ctx.clear(Color::BLUE);
        ctx.draw(&flat_batch);

        // a failed texture load leaves the quad flat white
        match checker.get() {
            Some(id) => ctx.draw_textured(&quad_batch, id),
            None => ctx.draw(&quad_batch),
        }
    });
}
