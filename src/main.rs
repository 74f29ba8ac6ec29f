//! regionpick 命令行入口，所有输出均为格式化 JSON

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

use regionpick::{
    CodeKind, ConfigManager, DetailParams, DwellingType, InfraImportance, InfraMajor,
    RecommendClient, RecommendationParams, RegionIndex, RegionLoader, RegionSnapshotStore,
};

#[derive(Parser, Debug)]
#[command(name = "regionpick", author, version, about)]
struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 推荐服务根地址（覆盖 REGIONPICK_API_BASE_URL）
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// 请求超时（秒）
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 从 CSV 构建行政区划索引并查询
    Regions {
        #[arg(long)]
        csv: PathBuf,
        /// 列出某个省级编码下的区县
        #[arg(long)]
        province: Option<String>,
        /// 按名称搜索区县
        #[arg(long)]
        search: Option<String>,
        /// 把索引快照写入文件
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// 把选中项编码为位掩码
    Encode {
        #[arg(long, value_delimiter = ',', required = true)]
        options: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,
    },
    /// 把位掩码还原为选中项
    Decode {
        #[arg(long, value_delimiter = ',', required = true)]
        options: Vec<String>,
        #[arg(long)]
        mask: u64,
    },
    /// 获取推荐列表
    Recommend {
        #[arg(long, value_enum, ignore_case = true, default_value_t = DwellingArg::Monthly)]
        dwelling: DwellingArg,
        /// 价格档，缺省时按住房类型取默认值
        #[arg(long)]
        price: Option<u32>,
        #[arg(long, value_enum, ignore_case = true, default_value_t = ImportanceArg::Low)]
        importance: ImportanceArg,
        /// 基础设施大类，逗号分隔（HEALTH,FOOD,CULTURE,LIFE）
        #[arg(long, value_delimiter = ',')]
        infra: Vec<String>,
        /// 岗位中类编码
        #[arg(long)]
        job: Option<String>,
        /// 区划 CSV，用于补全缺失的区划名称
        #[arg(long)]
        regions: Option<PathBuf>,
    },
    /// 获取区县详情
    Detail {
        #[arg(long)]
        sigungu: String,
        #[arg(long)]
        job: Option<String>,
        /// 请求 AI 摘要
        #[arg(long)]
        ai: bool,
        /// 输出推荐卡片形态的摘要（用于区县对比）
        #[arg(long)]
        summary: bool,
        #[arg(long)]
        regions: Option<PathBuf>,
    },
    /// 获取编码表
    Codes {
        #[arg(value_enum)]
        kind: CodeArg,
        /// 上级编码（job-mid 需要岗位大类编码，sigungu 需要省级编码）
        #[arg(long)]
        parent: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DwellingArg {
    Monthly,
    Jeonse,
}

impl From<DwellingArg> for DwellingType {
    fn from(arg: DwellingArg) -> Self {
        match arg {
            DwellingArg::Monthly => DwellingType::Monthly,
            DwellingArg::Jeonse => DwellingType::Jeonse,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ImportanceArg {
    Low,
    Mid,
    High,
}

impl From<ImportanceArg> for InfraImportance {
    fn from(arg: ImportanceArg) -> Self {
        match arg {
            ImportanceArg::Low => InfraImportance::Low,
            ImportanceArg::Mid => InfraImportance::Mid,
            ImportanceArg::High => InfraImportance::High,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodeArg {
    JobTop,
    JobMid,
    SupportTag,
    Sido,
    Sigungu,
}

impl CodeArg {
    fn into_kind(self, parent: Option<String>) -> CodeKind {
        let parent = parent.unwrap_or_default();
        match self {
            CodeArg::JobTop => CodeKind::JobTop,
            CodeArg::JobMid => CodeKind::job_mid(&parent),
            CodeArg::SupportTag => CodeKind::SupportTag,
            CodeArg::Sido => CodeKind::Sido,
            CodeArg::Sigungu => CodeKind::sigungu(&parent),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_regions(csv: &Path) -> Result<RegionIndex> {
    let rows = RegionLoader::load_csv_path(csv)
        .with_context(|| format!("读取区划文件失败：{}", csv.display()))?;
    let index = RegionIndex::from_rows(&rows);
    info!(
        "区划索引构建完成：省级{}个，区县{}个",
        index.list_provinces().len(),
        index.list_districts().len()
    );
    Ok(index)
}

fn build_client(cli: &Cli, regions: Option<&Path>) -> Result<RecommendClient> {
    let env = ConfigManager::from_env();
    let config = ConfigManager::custom()
        .api_base_url(cli.base_url.as_deref().unwrap_or(&env.api_base_url))
        .http_timeout(cli.timeout.unwrap_or(env.http_timeout))
        .user_agent(env.user_agent.clone())
        .verbose(cli.verbose)
        .build();

    let mut client = RecommendClient::new(config)?;
    if let Some(csv) = regions {
        client = client.with_regions(Arc::new(load_regions(csv)?));
    }
    Ok(client)
}

fn parse_infra(tags: &[String]) -> Result<Vec<InfraMajor>> {
    tags.iter()
        .map(|tag| {
            InfraMajor::from_tag(tag).with_context(|| format!("未知的基础设施大类：{}", tag))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "regionpick=debug" } else { "regionpick=warn" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Regions {
            csv,
            province,
            search,
            snapshot,
        } => {
            let index = load_regions(csv)?;
            if let Some(path) = snapshot {
                RegionSnapshotStore::save(path, &index).await?;
                debug!("快照已写入：{}", path.display());
            }
            if let Some(code) = province {
                print_json(&index.districts_of(code))
            } else if let Some(query) = search {
                print_json(&index.search_districts(query))
            } else {
                print_json(&index.list_provinces())
            }
        }
        Command::Encode { options, select } => {
            let mask = regionpick::encode(options.as_slice(), select);
            print_json(&json!({ "mask": mask }))
        }
        Command::Decode { options, mask } => {
            let selected = regionpick::decode(options.as_slice(), *mask);
            print_json(&json!({ "selected": selected }))
        }
        Command::Recommend {
            dwelling,
            price,
            importance,
            infra,
            job,
            regions,
        } => {
            let dwelling = DwellingType::from(*dwelling);
            let price = price.unwrap_or_else(|| dwelling.default_price());
            if price == 0 {
                bail!("价格档必须大于0");
            }

            let mut params = RecommendationParams::new(dwelling, price, (*importance).into());
            if !infra.is_empty() {
                params = params.with_infra(&parse_infra(infra)?);
            }
            if let Some(code) = job {
                params = params.with_mid_job_code(code);
            }

            let client = build_client(&cli, regions.as_deref())?;
            let set = client.recommend(&params).await?;
            print_json(&json!({
                "items": set.ranked(),
                "aiPick": set.ai_picks,
            }))
        }
        Command::Detail {
            sigungu,
            job,
            ai,
            summary,
            regions,
        } => {
            let params = DetailParams {
                sigungu_code: sigungu.clone(),
                mid_job_code: job.clone(),
                ai_use: ai.then_some(true),
            };
            let client = build_client(&cli, regions.as_deref())?;
            let detail = client.detail(&params).await?;
            if *summary {
                print_json(&detail.to_summary())
            } else {
                print_json(&detail)
            }
        }
        Command::Codes { kind, parent } => {
            let client = build_client(&cli, None)?;
            let items = client.codes(&kind.into_kind(parent.clone())).await?;
            print_json(items.as_ref())
        }
    }
}
