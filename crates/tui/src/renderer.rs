use std::cell::RefCell;
use std::io::stdout;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use vantage_core::{DeviceObserver, ManualEvents, ManualScheduler, Snapshot};
use vantage_protocol::DeviceClass;

const IDLE_POLL: Duration = Duration::from_millis(250);

fn class_color(class: DeviceClass) -> Color {
    match class {
        DeviceClass::SmallMobile => Color::Magenta,
        DeviceClass::LargeMobile => Color::Red,
        DeviceClass::Tablet => Color::Yellow,
        DeviceClass::Desktop => Color::Green,
    }
}

fn flag(label: &str, on: bool) -> Span<'static> {
    let style = if on {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!(" {label} "), style)
}

fn snapshot_lines(snapshot: &Snapshot) -> Vec<Line<'static>> {
    let device = &snapshot.device;
    let viewport = &snapshot.viewport;
    let hints = snapshot.hints();
    let class = device.class();

    vec![
        Line::from(vec![
            Span::raw("class   "),
            Span::styled(
                class.to_string(),
                Style::default()
                    .fg(class_color(class))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!(
            "screen  {} × {} px",
            device.screen_width, device.screen_height
        )),
        Line::from(vec![
            Span::raw("size   "),
            flag("mobile", device.is_mobile),
            flag("small", device.is_small_mobile),
            flag("large", device.is_large_mobile),
            flag("tablet", device.is_tablet),
            flag("desktop", device.is_desktop),
        ]),
        Line::from(vec![
            Span::raw("caps   "),
            flag("touch", device.is_touch_device),
            flag("low-end", device.is_low_end_device),
        ]),
        Line::raw(""),
        Line::from(format!(
            "aspect  {:.3} ({})",
            viewport.aspect_ratio,
            if viewport.is_portrait {
                "portrait"
            } else {
                "landscape"
            }
        )),
        Line::from(format!(
            "units   50vw={:.0} 50vh={:.0} 10vmin={:.0} 10vmax={:.0}",
            viewport.vw(50.0),
            viewport.vh(50.0),
            viewport.vmin(10.0),
            viewport.vmax(10.0)
        )),
        Line::raw(""),
        Line::from(vec![
            Span::raw("effects"),
            flag("cursor", hints.custom_cursor),
            flag("hover", hints.hover_effects),
            flag("scroll", hints.scroll_choreography),
            flag("entrance", hints.entrance_animations),
            flag("reduced", hints.reduced_effects),
        ]),
    ]
}

/// What a terminal event means to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Resize,
    Orientation,
    Quit,
    Ignored,
}

impl Input {
    fn from_event(event: &Event) -> Self {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
                KeyCode::Char('o') => Input::Orientation,
                _ => Input::Ignored,
            },
            Event::Resize(cols, rows) => {
                tracing::trace!(cols, rows, "terminal resized");
                Input::Resize
            }
            _ => Input::Ignored,
        }
    }
}

/// Apply one input that arrived `now` after start. Returns false on quit.
///
/// The clock is moved to `now` before the event fires, so a resize is
/// debounced from when it arrived rather than from the last redraw.
fn dispatch(input: Input, events: &ManualEvents, clock: &ManualScheduler, now: Duration) -> bool {
    match input {
        Input::Quit => return false,
        Input::Resize => {
            clock.advance_to(now);
            events.fire_resize();
        }
        Input::Orientation => {
            clock.advance_to(now);
            events.fire_orientation_change();
        }
        Input::Ignored => {}
    }
    true
}

/// Runs `restore` when dropped, including on an early `?` return.
struct Restore<F: FnMut()>(F);

impl<F: FnMut()> Drop for Restore<F> {
    fn drop(&mut self) {
        (self.0)();
    }
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        tracing::warn!(error = %e, "failed to leave raw mode");
    }
    if let Err(e) = execute!(stdout(), LeaveAlternateScreen, Show) {
        tracing::warn!(error = %e, "failed to leave alternate screen");
    }
}

struct Published {
    snapshot: Option<Snapshot>,
    count: u64,
}

/// Run the live view until the user quits.
///
/// `clock` is the observer's scheduler; it is advanced to wall-clock time
/// on every pass so debounced resizes fire on schedule.
pub fn run_tui(
    observer: &DeviceObserver,
    events: &ManualEvents,
    clock: &ManualScheduler,
) -> Result<()> {
    let published = Rc::new(RefCell::new(Published {
        snapshot: None,
        count: 0,
    }));
    let sink = published.clone();
    let subscription = observer.subscribe(move |snapshot| {
        let mut published = sink.borrow_mut();
        published.snapshot = Some(*snapshot);
        published.count += 1;
    });

    enable_raw_mode()?;
    let _restore = Restore(restore_terminal);
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let started = Instant::now();

    loop {
        clock.advance_to(started.elapsed());

        let live = observer.current();
        let resize_pending = observer.resize_pending();

        terminal.draw(|frame| {
            let area = frame.area();

            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(" vantage | resize the window | o orientation | q quit ")
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let body = Rect::new(0, 1, area.width, area.height.saturating_sub(1));
            let [left, right] =
                Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .areas(body);

            let published = published.borrow();
            let title = format!(
                " published #{}{} ",
                published.count,
                if resize_pending { " (resize pending)" } else { "" }
            );
            let lines = published
                .snapshot
                .as_ref()
                .map(snapshot_lines)
                .unwrap_or_default();
            frame.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
                left,
            );

            frame.render_widget(
                Paragraph::new(snapshot_lines(&live))
                    .block(Block::default().borders(Borders::ALL).title(" live ")),
                right,
            );
        })?;

        let timeout = clock
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(started.elapsed()))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);

        if event::poll(timeout)? {
            let input = Input::from_event(&event::read()?);
            if !dispatch(input, events, clock, started.elapsed()) {
                break;
            }
        }
    }

    subscription.unsubscribe();
    Ok(())
}
