//! Space Rocks entry point
//!
//! Native builds run the game headless: levels load from disk, the ship
//! flies on autopilot and frames are described to a renderer that only
//! counts draw calls. A windowed frontend supplies its own `AssetBank`
//! and `Renderer` and drives the same `tick`/`render` pair.
//!
//! Usage: `space-rocks [levels-root] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::{Path, PathBuf};
    use std::time::{Duration, Instant};

    use glam::Vec2;
    use space_rocks::assets::{Animation, MemoryBank};
    use space_rocks::host::Renderer;
    use space_rocks::hud::Hud;
    use space_rocks::levels::{load_asset_bank, load_levels};
    use space_rocks::sim::{Game, LevelConfig, TickInput, World, tick};
    use space_rocks::watch::LevelWatcher;
    use space_rocks::{Display, Settings};

    /// Counts what a frame would draw
    #[derive(Debug, Default)]
    struct CountingRenderer {
        sprites: usize,
        animations: usize,
        message: Option<String>,
    }

    impl Renderer for CountingRenderer {
        fn draw_sprite(&mut self, _sprite: &str, _position: Vec2, _rotation: f32, _scale: f32) {
            self.sprites += 1;
        }

        fn draw_animation(&mut self, _animation: &Animation) {
            self.animations += 1;
        }

        fn draw_hud(&mut self, _hud: &Hud) {}

        fn draw_message(&mut self, message: &str) {
            self.message = Some(message.to_string());
        }
    }

    fn load(root: &Path, settings: &Settings) -> Result<(Vec<LevelConfig>, MemoryBank), String> {
        let levels = load_levels(root).map_err(|e| e.to_string())?;
        let mut bank = load_asset_bank(root, &levels).map_err(|e| e.to_string())?;
        bank.set_audio_enabled(settings.audio_enabled);
        bank.set_volume(settings.effective_volume());
        Ok((levels, bank))
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let root_arg = args.next().map(PathBuf::from);
        let settings_path = args.next().unwrap_or_else(|| "settings.json".to_string());

        let mut settings = Settings::load_from(Path::new(&settings_path));
        if let Some(root) = root_arg {
            settings.levels_root = root;
        }
        let root = settings.levels_root.clone();

        let (levels, mut bank) = match load(&root, &settings) {
            Ok(loaded) => loaded,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                std::process::exit(1);
            }
        };
        let world = match World::new(levels, settings.seed) {
            Ok(world) => world,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                std::process::exit(1);
            }
        };
        log::info!("Game initialized with seed: {}", settings.seed);

        let display = Display::new(settings.screen_width, settings.screen_height);
        let mut game = Game::new(world, display);

        let mut watcher = if settings.watch_levels {
            match LevelWatcher::new(&root) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    log::warn!("Hot reload disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let frame_time = Duration::from_millis(settings.frame_millis);
        let start = Instant::now();
        let mut frames: u64 = 0;
        let mut last_message: Option<String> = None;

        while settings.max_frames.is_none_or(|max| frames < max) {
            if watcher.as_mut().is_some_and(|w| w.poll()) {
                match load(&root, &settings) {
                    Ok((levels, reloaded)) => {
                        bank = reloaded;
                        game.queue_reload(levels);
                    }
                    Err(e) => log::warn!("Keeping current levels: {}", e),
                }
            }

            let input = TickInput {
                autopilot: true,
                toggle_debug: frames == 0 && settings.show_debug,
                ..Default::default()
            };
            let now_ms = start.elapsed().as_millis() as u64;
            if let Err(e) = tick(&mut game, &input, now_ms, &mut bank) {
                log::error!("Level failed to load: {}", e);
                std::process::exit(1);
            }

            let mut renderer = CountingRenderer::default();
            game.render(&mut renderer);
            if renderer.message != last_message {
                if let Some(message) = &renderer.message {
                    log::info!("{}", message);
                }
                last_message = renderer.message;
            }
            log::trace!(
                "frame {}: {} sprites, {} animations",
                frames,
                renderer.sprites,
                renderer.animations
            );
            for sound in bank.take_played() {
                log::debug!("sound {} (repeat: {}, volume: {:.2})", sound.id, sound.repeat, sound.volume);
            }

            frames += 1;
            std::thread::sleep(frame_time);
        }

        let (id, name) = game.world().current_level();
        log::info!("Stopped after {} frames on level {} '{}'", frames, id, name);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Space Rocks (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser frontend embeds the library directly
}
