use clap::Parser;
use parking_lot::Mutex;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use graphmerge::api::BatchService;
use graphmerge::config::Config;
use graphmerge::core::error::{BatchError, PublicError, ToPublicError};
use graphmerge::core::{BatchRequest, GraphElement};
use graphmerge::storage::metadata::{MemorySchemaManager, SchemaDefinition};
use graphmerge::storage::mutate::ElementValidator;
use graphmerge::storage::{BatchUpdateProcessor, MemoryStorage};
use graphmerge::utils::logging;

#[derive(Parser)]
#[clap(version = "0.1.0", author = "GraphDB Contributors")]
enum Cli {
    /// Apply a batch update against in-memory storage and print the results
    Apply {
        /// Schema definition (JSON)
        #[clap(short, long)]
        schema: PathBuf,
        /// Elements to load before the batch runs (JSON array)
        #[clap(short, long)]
        data: Option<PathBuf>,
        /// Batch request (JSON)
        #[clap(short, long)]
        request: PathBuf,
        #[clap(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a batch request without executing it
    Check {
        #[clap(short, long)]
        request: PathBuf,
        #[clap(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn Error>> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

// 请求未指定 create_if_not_exist 时使用配置中的默认值
fn read_request(path: &Path, config: &Config) -> Result<BatchRequest, Box<dyn Error>> {
    let mut raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    if let Some(object) = raw.as_object_mut() {
        object
            .entry("create_if_not_exist")
            .or_insert(serde_json::Value::Bool(config.batch.create_if_not_exist_default));
    }
    Ok(serde_json::from_value(raw)?)
}

fn print_error(error: PublicError) {
    match serde_json::to_string_pretty(&error) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}: {}", error.code, error.message),
    }
}

async fn apply(
    schema: &Path,
    data: Option<&Path>,
    request: &Path,
    config: &Config,
) -> Result<ExitCode, Box<dyn Error>> {
    let definition: SchemaDefinition = serde_json::from_str(&fs::read_to_string(schema)?)?;
    let schema = Arc::new(MemorySchemaManager::from_definition(&definition)?);
    let storage = Arc::new(Mutex::new(MemoryStorage::new()));
    let processor = BatchUpdateProcessor::new(storage, schema).with_config(config);

    if let Some(data) = data {
        let elements: Vec<GraphElement> = serde_json::from_str(&fs::read_to_string(data)?)?;
        processor.load_elements(elements)?;
    }

    let request = read_request(request, config)?;
    let service = BatchService::new(Arc::new(processor));
    match service.update_batch(request).await {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_error(e.to_public_error());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn check(request: &Path, config: &Config) -> Result<ExitCode, Box<dyn Error>> {
    let request = read_request(request, config)?;
    match ElementValidator::new(config.batch.max_elements).validate(&request) {
        Ok(()) => {
            println!("请求有效: {} 个元素", request.len());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_error(BatchError::from(e).to_public_error());
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();

    let code = match cli {
        Cli::Apply {
            schema,
            data,
            request,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            if let Err(e) = logging::init(&config.log) {
                eprintln!("日志初始化失败: {}", e);
            }
            let code = apply(&schema, data.as_deref(), &request, &config).await;
            logging::shutdown();
            code?
        }
        Cli::Check { request, config } => {
            let config = load_config(config.as_deref())?;
            check(&request, &config)?
        }
    };

    Ok(code)
}
