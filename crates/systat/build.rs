use std::fs;
use std::path::{Path, PathBuf};

use clap::{Command, CommandFactory};
use clap_complete::{Shell, generate_to};

// cli.rs only depends on clap, clap_complete and humantime, all of which
// are build-dependencies.
#[allow(dead_code)]
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").expect("OUT_DIR not set by Cargo"));
    let mut cmd = cli::Cli::command();

    for (page, sub) in man_pages(&cmd) {
        write_man_page(&out_dir.join("man"), &page, sub);
    }
    write_completions(&mut cmd, &out_dir.join("completions"));
}

/// Every visible command paired with its page name: `systat`,
/// `systat-config`, `systat-config-show` and so on, parents first.
fn man_pages(root: &Command) -> Vec<(String, Command)> {
    let mut pages = vec![(root.get_name().to_owned(), root.clone())];
    let mut next = 0;
    while next < pages.len() {
        let (parent, cmd) = &pages[next];
        let children: Vec<_> = cmd
            .get_subcommands()
            .filter(|sub| !sub.is_hide_set())
            .map(|sub| (format!("{parent}-{}", sub.get_name()), sub.clone()))
            .collect();
        pages.extend(children);
        next += 1;
    }
    pages
}

fn write_man_page(dir: &Path, page: &str, cmd: Command) {
    fs::create_dir_all(dir).expect("failed to create man output directory");

    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd.name(page.to_owned()))
        .render(&mut buf)
        .unwrap_or_else(|e| panic!("failed to render {page}.1: {e}"));

    let path = dir.join(format!("{page}.1"));
    fs::write(&path, buf).unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}

fn write_completions(cmd: &mut Command, dir: &Path) {
    fs::create_dir_all(dir).expect("failed to create completions output directory");
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        generate_to(shell, cmd, "systat", dir)
            .unwrap_or_else(|e| panic!("failed to write {shell} completions: {e}"));
    }
}
