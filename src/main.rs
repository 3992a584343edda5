//! sidenav: build a sidebar table of contents for articles and preview it in the terminal.
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, ValueEnum};
use ratatui::crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sidenav::app_state::PreviewState;
use sidenav::render::{self, OutputFormat};
use sidenav::{config, input, toc, ui, SidenavError};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Html => Self::Html,
            Format::Text => Self::Text,
            Format::Json => Self::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "sidenav")]
#[command(about = "Sidebar table of contents for articles", long_about = None)]
struct Args {
    /// Files or directories to process
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Output format for the table of contents
    #[arg(long, short = 'f', value_enum, default_value = "html")]
    format: Format,

    /// Print the document with anchor ids written onto its headings
    #[arg(long)]
    annotate: bool,

    /// Rewrite each document in place with anchor ids
    #[arg(long)]
    write: bool,

    /// Open the scrolling preview for the first document
    #[arg(long)]
    preview: bool,

    /// Tag of the content container element
    #[arg(long, value_name = "TAG")]
    container: Option<String>,

    /// Prefix for generated anchor ids
    #[arg(long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// File extensions to match
    #[arg(long, short = 'e', value_name = "EXT")]
    ext: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    // The preview owns the terminal, so it runs without a logger
    if !args.preview {
        env_logger::init();
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), SidenavError> {
    let mut cfg = config::Config::load();

    // Override config with command line args
    if !args.ext.is_empty() {
        cfg.file_extensions = args.ext;
    }
    if let Some(container) = args.container {
        cfg.container = container;
    }
    if let Some(prefix) = args.prefix {
        cfg.anchor_prefix = prefix;
    }

    let paths = input::find_documents(args.paths, &cfg.file_extensions)?;
    if paths.is_empty() {
        eprintln!("No matching files found");
        return Ok(());
    }

    if args.preview {
        let doc = input::load_document(&paths[0], &cfg.container)?;
        let build = toc::build_toc(&doc.headings, &cfg.anchor_prefix);
        let size = ratatui::crossterm::terminal::size()
            .map_err(|e| SidenavError::io(&paths[0], e))?;
        let state = PreviewState::new(&doc, build, &cfg, size, Instant::now());
        return run_tui(state).map_err(|e| SidenavError::io(&paths[0], e));
    }

    let multiple = paths.len() > 1;
    for path in &paths {
        let doc = match input::load_document(path, &cfg.container) {
            Ok(doc) => doc,
            Err(e) if multiple => {
                log::warn!("skipping {}: {e}", path.display());
                continue;
            }
            Err(e) => return Err(e),
        };
        let build = toc::build_toc(&doc.headings, &cfg.anchor_prefix);

        if multiple {
            println!("==> {} <==", path.display());
        }
        let rendered = render::render(build.as_ref().map(|b| &b.tree), args.format.into())?;
        if !rendered.is_empty() {
            println!("{rendered}");
        }

        let Some(build) = build else {
            continue;
        };
        if args.annotate || args.write {
            let annotated =
                render::annotate(&doc.source, &doc.headings, &build.anchors, doc.format.as_ref());
            if args.write {
                fs::write(path, &annotated).map_err(|e| SidenavError::io(path, e))?;
                log::info!("wrote {} anchors to {}", build.anchors.len(), path.display());
            } else {
                println!("{annotated}");
            }
        }
    }

    Ok(())
}

fn run_tui(mut app: PreviewState) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut PreviewState,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;
        app.frame_drawn();

        if !event::poll(Duration::from_millis(50))? {
            app.tick(Instant::now());
            continue;
        }
        let now = Instant::now();
        match event::read()? {
            Event::Key(key) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_by(-1, now),
                KeyCode::Down | KeyCode::Char('j') => app.scroll_by(1, now),
                KeyCode::PageUp => app.page_up(now),
                KeyCode::PageDown | KeyCode::Char(' ') => app.page_down(now),
                KeyCode::Home => app.scroll_to(0, now),
                KeyCode::End => app.scroll_to(app.max_scroll(), now),
                _ => {}
            },
            Event::Resize(width, height) => app.on_resize(width, height),
            _ => {}
        }
    }
}
