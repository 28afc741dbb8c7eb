//! Roverdrive - drive a rover across procedurally generated Mars terrain

mod config;
mod events;
mod hud;
mod navigation;
mod world;

use anyhow::Result;
use engine_core::{Time, WorldQuery};
use input::{InputState, KeyCode, TouchControls};
use rover::{Simulation, TransitionContext};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId},
};

use config::GameConfig;
use navigation::{handle_portal_event, Navigation};
use world::World;

/// Seconds between window-title telemetry refreshes.
const HUD_REFRESH: f32 = 0.25;

/// Everything owned by a running session.
pub(crate) struct GameState {
    window: Arc<Window>,
    config: GameConfig,
    world: World,
    sim: Simulation,
    input: InputState,
    touch: TouchControls,
    time: Time,
    running: bool,
    hud_timer: f32,
}

impl GameState {
    fn new(window: Arc<Window>, config: GameConfig) -> Result<Self> {
        let world = World::build(&config)?;
        let spawn = world.spawn_point(&config);
        let portals = world.grounded_portals(&config.portals);
        let context = TransitionContext {
            username: config.username.clone(),
            origin: config.origin_url.clone(),
        };
        let mut sim = Simulation::new(config.tuning.clone(), spawn, 0.0, portals, context)?;

        let size = window.inner_size();
        sim.camera_mut().set_aspect(size.width, size.height);
        let touch = TouchControls::for_window(size.width as f32, size.height as f32);

        Ok(Self {
            window,
            config,
            world,
            sim,
            input: InputState::new(),
            touch,
            time: Time::new(),
            running: true,
            hud_timer: 0.0,
        })
    }

    /// One frame: read controls, tick the simulation, follow the ground, act on portals.
    fn update(&mut self) {
        self.time.update();
        let delta = self.time.delta_seconds();

        if self.input.is_key_pressed(KeyCode::Escape) {
            self.running = false;
        }
        let controls = self.input.snapshot().merge(self.touch.snapshot());

        let world: &dyn WorldQuery = &self.world.physics;
        match self.sim.tick(&controls, delta, Some(world)) {
            Ok(report) => {
                if let Some(impact) = report.collision {
                    let pose = self.sim.vehicle().transform();
                    log::info!(
                        "Impact at {:.1} m/s near {:.1?} heading {:.2?}: -{:.0} HP ({:.0} left)",
                        impact.speed,
                        pose.position,
                        pose.forward(),
                        impact.damage,
                        self.sim.vehicle().health()
                    );
                }
                for event in &report.portal_events {
                    if let Navigation::Leave(url) =
                        handle_portal_event(event, self.config.stay_on_transition)
                    {
                        log::info!(
                            "Leaving for {} after {:.0}s",
                            url,
                            self.time.elapsed_seconds()
                        );
                        self.running = false;
                    }
                }
            }
            Err(e) => log::warn!("Frame skipped: {}", e),
        }

        let position = self.sim.vehicle().position();
        self.sim
            .settle_on_ground(self.world.ground_height(position.x, position.z));
        let vehicle = self.sim.vehicle();
        self.world
            .physics
            .sync_vehicle(vehicle.position(), vehicle.heading());
        self.world.physics.update_query_pipeline();

        self.hud_timer += delta;
        if self.hud_timer >= HUD_REFRESH {
            self.hud_timer = 0.0;
            self.window
                .set_title(&hud::status_line(
                    self.sim.vehicle(),
                    &self.config.username,
                    self.time.fps(),
                ));
        }

        self.input.begin_frame();
    }
}

/// Application handler for winit.
struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = GameConfig::load();
            let mut window_attrs = Window::default_attributes()
                .with_title("Roverdrive")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    config.window_width,
                    config.window_height,
                ));
            if config.fullscreen {
                window_attrs = window_attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
            }

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match GameState::new(window.clone(), config) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize game: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════╗");
    println!("║                  ROVERDRIVE                  ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  W / Up     - Forward                        ║");
    println!("║  S / Down   - Brake, then reverse            ║");
    println!("║  A D / Left Right - Steer                    ║");
    println!("║  Shift      - Boost                          ║");
    println!("║  Escape     - Quit                           ║");
    println!("╚══════════════════════════════════════════════╝");

    log::info!("Starting Roverdrive");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
