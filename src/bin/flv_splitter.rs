use flvsplitter::{split_local_file, split_local_file_raw, SplitOptions, SplitSummary};
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    println!("🎬 FLV Splitter - Multi-Session Repair");
    println!("======================================");

    let mut input: Option<PathBuf> = None;
    let mut output_dir: Option<PathBuf> = None;
    let mut remux = true;
    let mut options = SplitOptions::default();

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--no-remux" => remux = false,
            "--drop-leading-frames" => options.drop_leading_non_keyframes = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ if input.is_none() => input = Some(PathBuf::from(&arg)),
            _ if output_dir.is_none() => output_dir = Some(PathBuf::from(&arg)),
            _ => {
                println!("Unexpected argument: {}", arg);
                print_usage();
                std::process::exit(2);
            }
        }
    }

    let Some(input) = input else {
        print_usage();
        std::process::exit(2);
    };
    if !input.exists() {
        println!("❌ File not found: {}", input.display());
        std::process::exit(1);
    }

    println!("📄 Input: {}", input.display());
    let result = if remux {
        split_local_file(&input, output_dir.as_deref(), options)
    } else {
        split_local_file_raw(&input, output_dir.as_deref(), options)
    };

    match result {
        Ok(summary) => {
            print_summary(&summary);
            if !summary.all_succeeded() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            println!("❌ Split failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Usage: flv_splitter <input.flv> [output_dir] [--no-remux] [--drop-leading-frames]");
    println!("Example: flv_splitter recording.flv ./parts");
}

fn print_summary(summary: &SplitSummary) {
    println!();
    println!(
        "Found {} boundary marker(s), {} session(s)",
        summary.boundary_markers,
        summary.sessions.len()
    );
    for session in &summary.sessions {
        match &session.error {
            None => println!(
                "  ✅ Part {}: {} ({} tags)",
                session.index,
                display_name(&session.path),
                session.tags_written
            ),
            Some(e) => println!("  ❌ Part {}: {}", session.index, e),
        }
    }
    if let Some(kind) = summary.parse_error {
        println!("⚠️  Input ended abnormally: {}", kind);
    }
    if let Some(e) = &summary.read_error {
        println!("⚠️  Read failed: {}", e);
    }
    if summary.all_succeeded() {
        println!("\n✅ Split completed successfully");
    }
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}
