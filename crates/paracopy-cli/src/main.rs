use anyhow::{Result, anyhow, bail};
use paracopy_config::Config;
use paracopy_engine::i18n::text;
use paracopy_engine::{
    ClipboardError, ClipboardSink, CopyHost, Locale, MemoryBlock, MemoryRoot, Message, Notifier,
    PassOutcome, PatternSet, RenderedBlock, RenderedRoot, SectionAction, TaskQueue,
    decorate_render, io, render_markdown,
};
use relative_path::{RelativePath, RelativePathBuf};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::{env, process};

const USAGE: &str = "\
Usage: paracopy [--notes <notes-folder-path>] <command>

Commands:
  sections <file>        Show the note's paragraphs and the copyable sections
  copy <file> <n>        Print section n (as numbered by `sections`)
  folders [query]        List folders under the notes folder matching query
  whitelist add <folder> Restrict decoration to notes under folder
  whitelist set          Replace the whitelist with folders read from stdin, one per line
  whitelist list         Show the whitelist folders";

#[derive(Debug, PartialEq)]
enum Command {
    Sections { file: RelativePathBuf },
    Copy { file: RelativePathBuf, index: usize },
    Folders { query: String },
    WhitelistAdd { folder: String },
    WhitelistSet,
    WhitelistList,
}

#[derive(Debug, PartialEq)]
struct Args {
    notes: Option<PathBuf>,
    command: Command,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut notes = None;
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--notes" {
            let path = iter.next().ok_or_else(|| anyhow!("--notes needs a path"))?;
            notes = Some(PathBuf::from(path));
        } else {
            rest.push(arg.as_str());
        }
    }

    let command = match rest.as_slice() {
        ["sections", file] => Command::Sections {
            file: RelativePathBuf::from(*file),
        },
        ["copy", file, index] => Command::Copy {
            file: RelativePathBuf::from(*file),
            index: index
                .parse()
                .map_err(|_| anyhow!("Section number must be a non-negative integer: {index}"))?,
        },
        ["folders"] => Command::Folders {
            query: String::new(),
        },
        ["folders", query] => Command::Folders {
            query: query.to_string(),
        },
        ["whitelist", "add", folder] => Command::WhitelistAdd {
            folder: folder.to_string(),
        },
        ["whitelist", "set"] => Command::WhitelistSet,
        ["whitelist", "list"] => Command::WhitelistList,
        _ => bail!("Unrecognised arguments: {}", rest.join(" ")),
    };

    Ok(Args { notes, command })
}

/// Writes the copied section to stdout.
struct StdoutClipboard;

impl ClipboardSink for StdoutClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{text}")
            .and_then(|()| out.flush())
            .map_err(|e| ClipboardError(e.to_string()))
    }
}

struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

fn locale_for(config: &Config) -> Locale {
    config
        .language
        .clone()
        .or_else(|| env::var("LANG").ok())
        .map(|tag| Locale::from_tag(&tag))
        .unwrap_or_default()
}

fn notes_root(args: &Args, config: &Config) -> Result<PathBuf> {
    let notes_path = args
        .notes
        .clone()
        .or_else(|| config.notes_path.clone())
        .ok_or_else(|| {
            anyhow!(
                "No notes path provided and none set in {}",
                Config::config_path().display()
            )
        })?;
    log::info!("Using notes folder: {}", notes_path.display());
    io::validate_notes_dir(&notes_path)
        .map_err(|e| anyhow!("Notes path '{}' is invalid: {e}", notes_path.display()))?;
    Ok(notes_path)
}

fn report_invalid_patterns(config: &Config, locale: Locale) {
    for invalid in PatternSet::compile(config.pattern_lines()).invalid {
        eprintln!("{}: {}", text(locale, Message::InvalidPattern), invalid.line());
    }
}

/// One line per block: affordance number, indentation marker, visible text.
fn format_listing(root: &MemoryRoot, actions: &[SectionAction<MemoryBlock>]) -> String {
    let mut lines = Vec::new();
    for (index, block) in root.blocks().iter().enumerate() {
        let number = actions
            .iter()
            .position(|a| a.block_index() == index)
            .map_or_else(|| "   ".to_string(), |n| format!("[{n}]"));
        let marker = block.indent_marker().map_or("-", |m| m.class_name());
        lines.push(format!("{number} {marker:<18} {}", block.visible_text()));
    }
    lines.join("\n")
}

fn render_note(
    args: &Args,
    config: &Config,
    file: &RelativePath,
) -> Result<(MemoryRoot, PassOutcome<MemoryBlock>)> {
    let notes_root = notes_root(args, config)?;
    let source = io::read_file(file, &notes_root)?;
    let root = render_markdown(&source);
    let outcome = decorate_render(&root, file, config);
    Ok((root, outcome))
}

/// Replace the whitelist with the folders listed in `input` and persist it.
fn set_whitelist(config: &mut Config, config_path: &Path, mut input: impl Read) -> Result<()> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    config.set_whitelist_from_text(&text);
    config.save_to_path(config_path)
}

fn run(args: Args) -> Result<()> {
    let config_path = Config::config_path();
    let mut config = Config::load_or_default(&config_path)?;
    let locale = locale_for(&config);
    log::debug!("Using config {} (locale {locale:?})", config_path.display());

    match &args.command {
        Command::Sections { file } => {
            report_invalid_patterns(&config, locale);
            let (root, outcome) = render_note(&args, &config, file)?;
            match &outcome {
                PassOutcome::OutOfScope => {
                    println!("{file} is outside the whitelist folders; nothing decorated")
                }
                PassOutcome::NoPatterns => println!("No usable patterns configured"),
                PassOutcome::Aborted => bail!("Decorating {file} failed"),
                PassOutcome::Decorated(_) => {}
            }
            println!("{}", format_listing(&root, outcome.actions()));
            for (name, value) in config.style_variables() {
                println!("{name}: {value}");
            }
        }
        Command::Copy { file, index } => {
            report_invalid_patterns(&config, locale);
            let (_, outcome) = render_note(&args, &config, file)?;
            if matches!(outcome, PassOutcome::OutOfScope) {
                bail!("{file} is outside the whitelist folders");
            }
            let actions = outcome.into_actions();
            let action = actions.get(*index).ok_or_else(|| {
                anyhow!("No section [{index}] in {file}; found {}", actions.len())
            })?;

            let queue = TaskQueue::new();
            action.invoke(&mut CopyHost {
                clipboard: &mut StdoutClipboard,
                notifier: &StderrNotifier,
                scheduler: &queue,
            })?;
            queue.run_all();
        }
        Command::Folders { query } => {
            let notes_root = notes_root(&args, &config)?;
            let folders = io::list_folders(&notes_root)?;
            for folder in io::suggest_folders(&folders, query) {
                println!("{folder}");
            }
        }
        Command::WhitelistAdd { folder } => {
            if config.add_whitelist_folder(folder) {
                config.save_to_path(&config_path)?;
                println!("{}{}", text(locale, Message::FolderAdded), folder.trim());
                println!("{}", text(locale, Message::SettingsSaved));
            } else {
                println!("{}", text(locale, Message::FolderDuplicate));
            }
        }
        Command::WhitelistSet => {
            set_whitelist(&mut config, &config_path, std::io::stdin().lock())?;
            println!("{}", text(locale, Message::SettingsSaved));
        }
        Command::WhitelistList => {
            let listing = config.whitelist_text();
            if !listing.is_empty() {
                println!("{listing}");
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let parsed = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    if let Err(e) = run(parsed) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parses_copy_with_notes_flag() {
        let parsed =
            parse_args(&args(&["copy", "law/lease.md", "2", "--notes", "/tmp/notes"])).unwrap();

        assert_eq!(
            parsed,
            Args {
                notes: Some(PathBuf::from("/tmp/notes")),
                command: Command::Copy {
                    file: RelativePathBuf::from("law/lease.md"),
                    index: 2,
                },
            }
        );
    }

    #[test]
    fn test_parses_folder_query_and_whitelist() {
        assert_eq!(
            parse_args(&args(&["folders"])).unwrap().command,
            Command::Folders {
                query: String::new()
            }
        );
        assert_eq!(
            parse_args(&args(&["whitelist", "add", "notes/law"])).unwrap().command,
            Command::WhitelistAdd {
                folder: "notes/law".to_string()
            }
        );
        assert_eq!(
            parse_args(&args(&["whitelist", "set"])).unwrap().command,
            Command::WhitelistSet
        );
    }

    #[test]
    fn test_set_whitelist_reads_lines_and_saves() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let mut config = Config {
            whitelist_folders: vec!["old".to_string()],
            ..Config::default()
        };

        set_whitelist(&mut config, &config_path, "notes/law\n\n  contracts  \n".as_bytes())
            .unwrap();

        assert_eq!(config.whitelist_text(), "notes/law\ncontracts");
        let saved = Config::load_from_path(&config_path).unwrap().unwrap();
        assert_eq!(saved.whitelist_folders, vec!["notes/law", "contracts"]);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["copy", "a.md", "-1"])).is_err());
        assert!(parse_args(&args(&["sections", "a.md", "--notes"])).is_err());
    }

    #[test]
    fn test_listing_numbers_sections() {
        let root = render_markdown("Article 1\n\nBody\n\nArticle 2\n");
        let config = Config {
            regex_patterns: "^Article".to_string(),
            ..Config::default()
        };

        let outcome = decorate_render(&root, RelativePath::new("a.md"), &config);

        assert_eq!(root.blocks().len(), 3);
        assert_eq!(
            format_listing(&root, outcome.actions()),
            [
                "[0] lac-indent-first   📋Article 1",
                "    lac-indent-first   Body",
                "[1] lac-indent-first   📋Article 2",
            ]
            .join("\n")
        );
    }
}
