use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use trimap::layout::{compute_layout, LayoutConfig, SplitMode};
use trimap::tree;

const USAGE: &str = "usage: trimap <records-file|-> [--squarify] [--parallel] [--strict] \
                     [--epsilon <f64>] [--size <f64>]";

/// Command-line options.
struct Options {
    input: Option<PathBuf>,
    config: LayoutConfig,
    size: f64,
}

/// `Ok(None)` means help was requested.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Options>> {
    let mut options = Options {
        input: None,
        config: LayoutConfig::default(),
        size: 1000.0,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--squarify" => options.config.mode = SplitMode::Squarify,
            "--parallel" => options.config.parallel = true,
            "--strict" => options.config.strict_weights = true,
            "--epsilon" => {
                let value = args.next().context("--epsilon needs a value")?;
                options.config.epsilon = value
                    .parse()
                    .with_context(|| format!("invalid --epsilon {value:?}"))?;
                if !(options.config.epsilon > 0.0) {
                    bail!("--epsilon must be positive");
                }
            }
            "--size" => {
                let value = args.next().context("--size needs a value")?;
                options.size = value
                    .parse()
                    .with_context(|| format!("invalid --size {value:?}"))?;
            }
            "-h" | "--help" => return Ok(None),
            "-" => options.input = None,
            other if other.starts_with("--") => bail!("unknown flag {other}\n{USAGE}"),
            other => options.input = Some(PathBuf::from(other)),
        }
    }

    Ok(Some(options))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("trimap=info".parse()?),
        )
        .init();

    let Some(options) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let (source, text) = match &options.input {
        Some(path) => (
            path.display().to_string(),
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read records from stdin")?;
            ("(stdin)".to_string(), text)
        }
    };

    let records =
        tree::parse_records(&text).with_context(|| format!("failed to parse {source}"))?;
    let weighted = tree::build_tree(&source, &records);

    let container = trimap::equilateral(options.size);
    let layout = compute_layout(&weighted, weighted.root, container, &options.config)
        .context("layout failed")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for cell in &layout.cells {
        let node = weighted.get(cell.node);
        let [a, b, c] = cell.triangle.points();
        writeln!(
            out,
            "{}\t{}\t{}\t{},{}\t{},{}\t{},{}",
            cell.depth,
            weighted.path_of(cell.node),
            node.weight,
            a.x,
            a.y,
            b.x,
            b.y,
            c.x,
            c.y
        )?;
    }
    out.flush()?;

    let stats = &layout.stats;
    tracing::info!(
        "Laid out {} nodes with {} splits ({} bisection steps, max last-child drift {:.4}%)",
        stats.nodes,
        stats.splits,
        stats.bisection_steps,
        stats.max_terminal_drift * 100.0
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_flags() {
        let options = parse_args(args(&["data.txt", "--squarify", "--epsilon", "0.01"]))
            .unwrap()
            .unwrap();
        assert_eq!(options.input, Some(PathBuf::from("data.txt")));
        assert_eq!(options.config.mode, SplitMode::Squarify);
        assert_eq!(options.config.epsilon, 0.01);
        assert!(!options.config.parallel);
    }

    #[test]
    fn help_is_not_an_error() {
        assert!(parse_args(args(&["--help"])).unwrap().is_none());
        assert!(parse_args(args(&["data.txt", "-h"])).unwrap().is_none());
    }

    #[test]
    fn rejects_unknown_flags_and_bad_values() {
        assert!(parse_args(args(&["--nope"])).is_err());
        assert!(parse_args(args(&["--epsilon"])).is_err());
        assert!(parse_args(args(&["--epsilon", "-1"])).is_err());
        assert!(parse_args(args(&["--size", "big"])).is_err());
    }
}
