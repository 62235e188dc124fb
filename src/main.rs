//! Command line frontend for the emulator: owns the window, blits the
//! framebuffer the core produces every VBLANK, forwards audio samples
//! to the host sink, and maps keyboard input to the joypad.

use std::path::PathBuf;

use dotmatrix_core::{GameBoy, GbKey};
use rodio::{OutputStream, Sink};
use structopt::StructOpt;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use pixels::{Pixels, SurfaceTexture};

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The maximum number of queued samples before the audio callback
/// starts dropping frames to avoid unbounded latency growth.
const MAX_QUEUED_SAMPLES: usize = 1024 * 8;

#[derive(StructOpt)]
#[structopt(name = "dotmatrix", version = PKG_VERSION, about = "A cycle-accurate Game Boy (DMG) emulator.")]
struct Opt {
    /// The Game Boy ROM file to execute.
    #[structopt(parse(from_os_str))]
    rom_file: PathBuf,

    /// Enable verbose logging.
    #[structopt(short, long)]
    verbose: bool,
}

/// Map a winit virtual keycode to a joypad key.
fn map_key(keycode: VirtualKeyCode) -> Option<GbKey> {
    match keycode {
        VirtualKeyCode::W => Some(GbKey::Up),
        VirtualKeyCode::A => Some(GbKey::Left),
        VirtualKeyCode::S => Some(GbKey::Down),
        VirtualKeyCode::D => Some(GbKey::Right),
        VirtualKeyCode::Return => Some(GbKey::Start),
        VirtualKeyCode::Space => Some(GbKey::Select),
        VirtualKeyCode::Z => Some(GbKey::ButtonA),
        VirtualKeyCode::X => Some(GbKey::ButtonB),

        _ => None,
    }
}

fn handle_keyboard_input(gb: &mut GameBoy, input: &KeyboardInput) {
    if let KeyboardInput {
        virtual_keycode: Some(keycode),
        state,
        ..
    } = input
    {
        if let Some(key) = map_key(*keycode) {
            match state {
                ElementState::Pressed => gb.key_down(key),
                ElementState::Released => gb.key_up(key),
            }
        }
    }
}

fn main() {
    let opt = Opt::from_args();

    if opt.verbose {
        env_logger::builder()
            .filter_module("dotmatrix_core", log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    let rom = std::fs::read(&opt.rom_file).expect("failed to read the ROM file");

    // Set up the host audio sink. If no device is available, log and
    // keep running silently: audio ticks still happen, the callback
    // just has nowhere to send samples. Samples the sink can't queue
    // (backlog above the cap) are dropped rather than blocking the
    // emulation thread.
    let sink = match OutputStream::try_default() {
        Ok((stream, handle)) => match Sink::try_new(&handle) {
            Ok(sink) => {
                // Leak the stream: it must outlive every sample we queue,
                // which in practice means the life of the process.
                Box::leak(Box::new(stream));
                Some(sink)
            }

            Err(err) => {
                log::error!("failed to create an audio sink: {}, continuing silently", err);
                None
            }
        },

        Err(err) => {
            log::error!("failed to initialize audio output: {}, continuing silently", err);
            None
        }
    };

    let audio_callback = Box::new(move |samples: &[i16]| {
        if let Some(sink) = &sink {
            if sink.len() > MAX_QUEUED_SAMPLES {
                return;
            }

            let source = rodio::buffer::SamplesBuffer::new(2, 44_100, samples.to_vec());
            sink.append(source);
        }
    });

    let mut gb = GameBoy::new(&rom, audio_callback);
    gb.skip_bootrom();

    log::info!("loaded \"{}\"", gb.game_title());

    let event_loop = EventLoop::new();

    let window = WindowBuilder::new()
        .with_title("dotmatrix")
        .with_inner_size(LogicalSize::new(480.0, 432.0))
        .with_min_inner_size(LogicalSize::new(160.0, 144.0))
        .build(&event_loop)
        .expect("failed to create a window");

    let mut pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);

        Pixels::new(160, 144, surface_texture).expect("failed to create a Pixels instance")
    };

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::MainEventsCleared => window.request_redraw(),

            Event::RedrawRequested(_) => {
                gb.execute_frame();

                pixels.get_frame().copy_from_slice(gb.get_framebuffer());

                if pixels.render().is_err() {
                    *control_flow = ControlFlow::Exit;
                }
            }

            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => *control_flow = ControlFlow::Exit,

            Event::WindowEvent {
                event: WindowEvent::Resized(size),
                ..
            } => pixels.resize_surface(size.width, size.height),

            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { input, .. },
                ..
            } => handle_keyboard_input(&mut gb, &input),

            _ => {}
        }
    });
}
