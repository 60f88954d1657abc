//! `userfs` - browse the live process table through a userfs mount.
//!
//! The filesystem is mounted at `/` of an in-process mount table backed by
//! the host's procfs; paths given on the command line are resolved against it.
//!
//! ```text
//! userfs ls /
//! userfs cat /1000/procs
//! userfs --color tree
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use userfs::config::USERFS_FS_TYPE;
use userfs::log::{LogLevel, logger};
use userfs::process::LinuxProcfs;
use userfs::vfs::{FS_TYPES, InodeFile, InodeType, MOUNT_TABLE, MountFlags};
use userfs::{FsError, pr_debug, register_filesystem};

/// Number of directory entries fetched per `getdents` call
const GETDENTS_BATCH: usize = 64;

#[derive(Parser)]
#[command(name = "userfs", version, about = "Live processes grouped by owner uid")]
struct Args {
    /// Color the procs heading
    #[arg(long)]
    color: bool,

    /// Byte budget of one procs file
    #[arg(long, default_value_t = 8192)]
    max_output: usize,

    /// Console log level (emerg, alert, crit, err, warn, notice, info, debug)
    #[arg(long, default_value = "warn")]
    log_level: LogLevel,

    /// procfs root to read processes from
    #[arg(long, default_value = "/proc")]
    procfs: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Print a file
    Cat { path: String },
    /// Print every user directory and its files
    Tree,
}

fn mount_data(args: &Args) -> String {
    let mut data = format!("max_output={}", args.max_output);
    if args.color {
        data.push_str(",color");
    }
    data
}

/// All entries of a directory, without `.` and `..`
fn read_dir(path: &str) -> Result<Vec<(String, InodeType)>, FsError> {
    let dir = InodeFile::open(MOUNT_TABLE.resolve(path)?)?;
    let mut entries = Vec::new();
    loop {
        let batch = dir.getdents(GETDENTS_BATCH)?;
        if batch.is_empty() {
            return Ok(entries);
        }
        entries.extend(
            batch
                .into_iter()
                .filter(|e| e.name != "." && e.name != "..")
                .map(|e| (e.name, e.inode_type)),
        );
    }
}

fn ls(out: &mut impl Write, path: &str) -> Result<(), FsError> {
    let file = InodeFile::open(MOUNT_TABLE.resolve(path)?)?;
    if file.metadata()?.inode_type == InodeType::File {
        writeln!(out, "{}", path)?;
        return Ok(());
    }
    for (name, inode_type) in read_dir(path)? {
        match inode_type {
            InodeType::Directory => writeln!(out, "{}/", name)?,
            InodeType::File => writeln!(out, "{}", name)?,
        }
    }
    Ok(())
}

fn cat(out: &mut impl Write, path: &str) -> Result<(), FsError> {
    let file = InodeFile::open(MOUNT_TABLE.resolve(path)?)?;
    out.write_all(&file.read_to_end()?)?;
    Ok(())
}

fn tree(out: &mut impl Write) -> Result<(), FsError> {
    writeln!(out, "/")?;
    let users = read_dir("/")?;
    for (i, (uid, _)) in users.iter().enumerate() {
        let last_user = i + 1 == users.len();
        let (branch, indent) = if last_user { ("└── ", "    ") } else { ("├── ", "│   ") };
        writeln!(out, "{}{}/", branch, uid)?;

        let files = read_dir(&format!("/{}", uid))?;
        for (j, (name, _)) in files.iter().enumerate() {
            let leaf = if j + 1 == files.len() { "└── " } else { "├── " };
            writeln!(out, "{}{}{}", indent, leaf, name)?;
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<(), FsError> {
    logger::init(args.log_level)?;

    register_filesystem(Arc::new(LinuxProcfs::with_root(&args.procfs)))?;
    MOUNT_TABLE.mount_by_type(&FS_TYPES, USERFS_FS_TYPE, "/", &mount_data(&args), MountFlags::READ_ONLY)?;
    pr_debug!("userfs: mounted at / over {}", args.procfs.display());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = match &args.command {
        Command::Ls { path } => ls(&mut out, path),
        Command::Cat { path } => cat(&mut out, path),
        Command::Tree => tree(&mut out),
    };
    out.flush()?;

    MOUNT_TABLE.umount("/")?;
    result
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("userfs: {}", e);
            ExitCode::from(e.to_errno().unsigned_abs().min(255) as u8)
        }
    }
}
