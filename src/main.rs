use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, terminal,
};
use flappy_tui::config::AppConfig;
use flappy_tui::error::Error;
use flappy_tui::game::{Flow, GameState, Input};
use flappy_tui::logging;
use flappy_tui::render::Renderer;
use log::{error, info};
use std::io::{self, Stdout, stdout};
use std::time::{Duration, Instant};

// ── Input ───────────────────────────────────────────────────────────────────

fn map_key(key: KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        // Raw mode swallows SIGINT, so Ctrl-C arrives as a key
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Input::Quit),
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Some(Input::Jump),
        _ => None,
    }
}

// ── Main ────────────────────────────────────────────────────────────────────

fn run(out: &mut Stdout, config: &AppConfig) -> Result<(), Error> {
    let (cols, rows) = terminal::size()?;
    let mut renderer = Renderer::new(cols as usize, rows as usize * 2);

    let clock = Instant::now();
    let mut game = GameState::new(config.tuning.clone(), config.seed, 0);
    let frame_dur = Duration::from_secs(1) / config.fps;

    loop {
        let frame_start = Instant::now();
        let now_ms = clock.elapsed().as_millis() as u64;

        // Input
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    let Some(input) = map_key(key) else { continue };
                    if game.handle_input(input, now_ms) == Flow::Quit {
                        info!("quit with score {}", game.score());
                        return Ok(());
                    }
                }
                Event::Resize(c, r) => renderer.resize(c as usize, r as usize * 2),
                _ => {}
            }
        }

        // Update
        game.update(now_ms);

        // Render
        renderer.draw(&game);
        renderer.present(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}

fn restore(out: &mut Stdout) -> io::Result<()> {
    execute!(
        out,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()
}

fn main() -> Result<(), Error> {
    let (config, source) = AppConfig::discover()?;
    logging::init(&config)?;
    match &source {
        Some(path) => info!("loaded config from {}", path.display()),
        None => info!("no config file, using defaults"),
    }

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    let result = execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )
    .map_err(Error::from)
    .and_then(|()| run(&mut out, &config));

    let restored = restore(&mut out);
    if let Err(e) = &result {
        error!("{e}");
    }
    result?;
    Ok(restored?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_jump_keys() {
        for code in [KeyCode::Char(' '), KeyCode::Up, KeyCode::Enter] {
            assert_eq!(map_key(press(code)), Some(Input::Jump));
        }
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), Some(Input::Quit));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Input::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c), Some(Input::Quit));
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(map_key(press(KeyCode::Char('c'))), None);
        assert_eq!(map_key(press(KeyCode::Down)), None);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut key = press(KeyCode::Char(' '));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key), None);
    }
}
