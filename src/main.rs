#[macro_use] extern crate clap;

mod graphics;
mod interface;
mod logging;
mod scenes;

use std::process;

use anyhow::{bail, Context};
use glutin::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::platform::run_return::EventLoopExtRunReturn;

use shaders::ShaderError;

use crate::graphics::GlWindow;
use crate::interface::cli::{cli_main, Command, Config};
use crate::logging::init_logging;
use crate::scenes::Demo;

fn open_window(events: &EventLoop<()>, config: &Config, visible: bool) -> anyhow::Result<GlWindow> {
    let window = GlWindow::create(events, config.width, config.height, &config.title, visible)?;

    if !window.load_entry_points() {
        bail!(ShaderError::Context("failed to load OpenGL function pointers".to_string()));
    }

    Ok(window)
}

fn run(config: &Config) -> anyhow::Result<()> {
    let mut events = EventLoop::new();
    let window = open_window(&events, config, true)?;

    let mut demo = Demo::build(window.driver(), config.scene, &config.shaders)
        .with_context(|| format!("failed to set up scene `{}`", config.scene))?;
    for diagnostic in demo.diagnostics() {
        log::error!("{}", diagnostic);
    }

    events.run_return(|event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    input: KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(VirtualKeyCode::Escape),
                        ..
                    },
                    ..
                } => *control_flow = ControlFlow::Exit,

                WindowEvent::Resized(size) => {
                    window.resize(size);
                    window.request_redraw();
                }

                _ => {}
            },

            Event::RedrawRequested(_) => {
                demo.draw();

                if let Err(e) = window.swap_buffers() {
                    log::error!("{}", e);
                    *control_flow = ControlFlow::Exit;
                }
            }

            _ => {}
        }
    });

    log::info!("closing scene `{}`", demo.scene());

    // GL objects go first, while their context still exists.
    drop(demo);
    drop(window);
    Ok(())
}

/// Builds the scene's programs in a hidden window and reports how that went. Returns true if
/// every stage compiled and every program linked.
fn check(config: &Config) -> anyhow::Result<bool> {
    let events = EventLoop::new();
    let window = open_window(&events, config, false)?;

    let demo = Demo::build(window.driver(), config.scene, &config.shaders)
        .with_context(|| format!("failed to set up scene `{}`", config.scene))?;

    let diagnostics = demo.diagnostics();
    if diagnostics.is_empty() {
        println!("scene `{}`: all shaders compiled and linked", config.scene);
    } else {
        for diagnostic in diagnostics {
            println!("{}", diagnostic);
        }
        println!(
            "scene `{}`: {} stage(s) failed to compile, {} program(s) failed to link",
            config.scene,
            diagnostics.iter().filter(|d| d.is_compilation()).count(),
            diagnostics.iter().filter(|d| d.is_link()).count()
        );
    }

    Ok(diagnostics.is_empty())
}

fn main() {
    let config = cli_main();

    init_logging(config.log_filter.as_deref());

    let result = match config.command {
        Command::Run => run(&config).map(|_| true),
        Command::Check => check(&config),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}
