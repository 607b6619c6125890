//! Phosphor - a terminal demoscene production
//!
//! Three execution contexts:
//! - the video thread runs the scheduler and compositor, one scanline at a
//!   time into the shared frame ring
//! - the audio thread owns the cpal transport and streams the track
//! - the main thread presents finished rows at a fixed cadence and handles
//!   the quit keys
//!
//! The workers never block on the presenter and the presenter never blocks
//! on the workers; the only shared state is the frame ring, the event
//! channel, and the shutdown flag.

mod audio;
mod screen;

use std::io::{self, stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};

use phosphor_engine::{event_channel, Demo, DemoEvent, Effect, FrameRing};
use phosphor_fx::{VIDEO_H, VIDEO_W};
use screen::ScreenWidget;

/// Production and presentation frame rate.
const FPS: u64 = 60;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the alternate screen stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let (evt_tx, evt_rx) = event_channel();
    let shutdown = Arc::new(AtomicBool::new(false));
    let ring = Arc::new(FrameRing::new());

    let video_handle = thread::spawn({
        let ring = ring.clone();
        let events = evt_tx.clone();
        let shutdown = shutdown.clone();
        move || run_video(&ring, &events, &shutdown)
    });

    let audio_handle = thread::spawn({
        let shutdown = shutdown.clone();
        move || audio::run_audio(evt_tx, shutdown)
    });

    let result = run_presenter(&mut terminal, &ring, &evt_rx, &shutdown);

    // Cleanup: stop the workers and restore the terminal even on error.
    shutdown.store(true, Ordering::SeqCst);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    let _ = video_handle.join();
    let _ = audio_handle.join();

    result
}

/// Video thread body: produce scanlines flat out within each frame, then
/// sleep off the rest of the frame budget. The producer is therefore always
/// a full frame ahead of the paced presenter.
fn run_video(
    ring: &FrameRing,
    events: &crossbeam_channel::Sender<DemoEvent>,
    shutdown: &AtomicBool,
) {
    let mut demo = Demo::new();
    let frame_budget = Duration::from_micros(1_000_000 / FPS);
    tracing::info!("video pipeline running");

    while !shutdown.load(Ordering::Relaxed) {
        let start = Instant::now();
        for _ in 0..VIDEO_H {
            if let Some(effect) = demo.render_scanline(ring) {
                let _ = events.try_send(DemoEvent::EffectChanged(effect));
            }
        }
        let elapsed = start.elapsed();
        if elapsed < frame_budget {
            thread::sleep(frame_budget - elapsed);
        }
    }
}

/// Presenter loop on the main thread: snapshot rows, paint, poll input.
fn run_presenter(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ring: &FrameRing,
    events: &crossbeam_channel::Receiver<DemoEvent>,
    shutdown: &AtomicBool,
) -> anyhow::Result<()> {
    let mut pixels = vec![0u16; VIDEO_W * VIDEO_H];
    let mut effect_label = Effect::Start.label();
    let frame_duration = Duration::from_millis(1000 / FPS);
    let mut last_frame = Instant::now();

    loop {
        if shutdown.load(Ordering::Relaxed) {
            return Ok(());
        }

        // Drain worker events.
        while let Ok(demo_event) = events.try_recv() {
            match demo_event {
                DemoEvent::EffectChanged(effect) => effect_label = effect.label(),
                DemoEvent::AudioFault(msg) => {
                    return Err(anyhow::anyhow!(msg)).context("audio transport failed");
                }
            }
        }

        // Pull whatever rows are ready. A row the producer holds right now
        // keeps its previous copy for this tick.
        let mut newest = 0u32;
        for y in 0..VIDEO_H {
            let row = &mut pixels[y * VIDEO_W..(y + 1) * VIDEO_W];
            if let Some(stamp) = ring.snapshot(y, row) {
                newest = newest.max(stamp);
            }
        }

        terminal.draw(|frame| {
            let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());
            frame.render_widget(ScreenWidget::new(&pixels), chunks[0]);
            render_status(frame, chunks[1], effect_label, newest);
        })?;

        // Handle input for the remainder of the frame budget.
        let timeout = frame_duration.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL));
                if quit {
                    return Ok(());
                }
            }
        }

        let elapsed = last_frame.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
        last_frame = Instant::now();
    }
}

fn render_status(frame: &mut ratatui::Frame, area: Rect, label: &str, frame_no: u32) {
    let text = format!(" PHOSPHOR  |  {label}  |  frame {frame_no}  |  q quits ");
    let line = Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)));
    frame.render_widget(Paragraph::new(line), area);
}
