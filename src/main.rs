use anyhow::{Result, anyhow, bail};
use clap::Parser;

use delta_pack::PackError;
use delta_pack::cli::{Cli, Commands};
use delta_pack::{hash_driver_file, inspect_storage, pack, unpack};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp(None)
        .format_target(false)
        .init();

    match cli.command {
        Commands::Pack {
            driver,
            source_dir,
            storage_dir,
        } => {
            if !driver.is_file() {
                return Err(anyhow!("驱动文件不存在: {:?}", driver));
            }
            if !source_dir.is_dir() {
                return Err(anyhow!("源目录不存在: {:?}", source_dir));
            }
            let summary = pack(&driver, &source_dir, &storage_dir)?;
            if summary.is_base() {
                println!("已建立基线: {}", summary.hash);
            } else {
                println!("已打包增量层: {} (基线 {})", summary.hash, summary.base);
            }
            println!("  {}", summary.summary());
        }
        Commands::Unpack {
            driver,
            storage_dir,
            output_dir,
        } => {
            if !driver.is_file() {
                return Err(anyhow!("驱动文件不存在: {:?}", driver));
            }
            if !storage_dir.is_dir() {
                return Err(anyhow!("存储目录不存在: {:?}", storage_dir));
            }
            match unpack(&driver, &storage_dir, &output_dir) {
                Ok(summary) => {
                    println!("已还原到: {}", output_dir.display());
                    println!("  {}", summary.summary());
                }
                Err(PackError::UnknownHash { hash, .. }) => {
                    bail!(
                        "存储目录中没有与 {:?} 当前内容对应的快照 ({}), 请先执行 pack",
                        driver,
                        hash
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Hash { driver } => {
            if !driver.is_file() {
                return Err(anyhow!("驱动文件不存在: {:?}", driver));
            }
            println!("{}", hash_driver_file(&driver)?);
        }
        Commands::Show {
            storage_dir,
            driver,
            files,
            toml,
        } => {
            if !storage_dir.is_dir() {
                return Err(anyhow!("存储目录不存在: {:?}", storage_dir));
            }
            let report = inspect_storage(&storage_dir, driver.as_deref())?;
            if toml {
                print!("{}", report.to_toml()?);
            } else {
                print!("{}", report.display(files));
            }
        }
    }

    Ok(())
}
