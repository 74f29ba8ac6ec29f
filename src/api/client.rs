//! 推荐服务客户端
//! 负责拼装请求、解析错误响应，并把响应交给规范化模块；不做任何自动重试

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::cache::CodeCache;
use super::model::{CodeItem, CodeKind, DetailParams, LegacySearchFilters, RecommendationParams};
use crate::config::ClientConfig;
use crate::error::{ApiError, ErrorPayload, RpResult};
use crate::normalize::{Normalizer, RecommendationSet, RegionDetail, to_code_items};
use crate::region::RegionIndex;

/// 推荐服务客户端
pub struct RecommendClient {
    http: Client,
    config: ClientConfig,
    codes: CodeCache,
    regions: Option<Arc<RegionIndex>>,
}

impl RecommendClient {
    /// 创建客户端；根地址缺失不会在这里报错，而是在首次请求时报错
    pub fn new(config: ClientConfig) -> RpResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            config,
            codes: CodeCache::new(),
            regions: None,
        })
    }

    /// 附带区划索引，用于补全响应中缺失的区划名称
    pub fn with_regions(mut self, regions: Arc<RegionIndex>) -> Self {
        self.regions = Some(regions);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 编码表缓存（可用于手动失效）
    pub fn code_cache(&self) -> &CodeCache {
        &self.codes
    }

    fn normalizer(&self) -> Normalizer<'_> {
        match self.regions.as_deref() {
            Some(regions) => Normalizer::with_regions(regions),
            None => Normalizer::new(),
        }
    }

    /// 拼接请求 URL，空值参数不出现在查询串中
    pub fn build_url(&self, path: &str, params: &[(&str, Option<String>)]) -> RpResult<Url> {
        let base = self.config.require_base_url()?;
        let mut url = Url::parse(&format!("{}/", base))?.join(path.trim_start_matches('/'))?;

        let present: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| (*key, v))
            })
            .collect();
        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }
        Ok(url)
    }

    /// GET 请求并解析 JSON；204 或空响应体返回 Null
    pub async fn get_json(&self, path: &str, params: &[(&str, Option<String>)]) -> RpResult<Value> {
        let url = self.build_url(path, params)?;
        debug!("请求推荐服务：{}", url);

        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let err = Self::api_error(response).await;
            warn!("推荐服务返回错误，URL：{}，{}", url, err);
            return Err(err.into());
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    /// 非2xx响应 -> ApiError；错误体或 Retry-After 无法解析时对应字段为空
    async fn api_error(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let payload = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<ErrorPayload>(&body).ok(),
            Err(e) => {
                debug!("读取错误响应体失败：{}", e);
                None
            }
        };

        ApiError::from_response(status, payload, retry_after_secs)
    }

    /// 推荐列表
    pub async fn recommend(&self, params: &RecommendationParams) -> RpResult<RecommendationSet> {
        let raw = self.get_json("/api/recommend", &params.query_pairs()).await?;
        let set = self.normalizer().recommendations(&raw);
        debug!("推荐结果{}条，AI推荐{}条", set.items.len(), set.ai_picks.len());
        Ok(set)
    }

    /// 使用旧版筛选条件获取推荐列表
    pub async fn recommend_legacy(&self, filters: LegacySearchFilters) -> RpResult<RecommendationSet> {
        self.recommend(&RecommendationParams::from(filters)).await
    }

    /// 区县详情
    pub async fn detail(&self, params: &DetailParams) -> RpResult<RegionDetail> {
        let raw = self.get_json("/api/detail", &params.query_pairs()).await?;
        Ok(self.normalizer().detail(&raw))
    }

    /// 编码表（带缓存与请求合并）；需要上级编码而上级编码为空时直接返回空列表
    pub async fn codes(&self, kind: &CodeKind) -> RpResult<Arc<Vec<CodeItem>>> {
        if kind.missing_parent() {
            return Ok(Arc::new(Vec::new()));
        }

        self.codes
            .get_or_fetch(&kind.cache_key(), || async {
                let raw = self.get_json(kind.path(), &kind.params()).await?;
                Ok(to_code_items(&raw))
            })
            .await
    }

    pub async fn job_top_codes(&self) -> RpResult<Arc<Vec<CodeItem>>> {
        self.codes(&CodeKind::JobTop).await
    }

    pub async fn job_mid_codes(&self, top_code: &str) -> RpResult<Arc<Vec<CodeItem>>> {
        self.codes(&CodeKind::job_mid(top_code)).await
    }

    pub async fn support_tags(&self) -> RpResult<Arc<Vec<CodeItem>>> {
        self.codes(&CodeKind::SupportTag).await
    }

    pub async fn sido_codes(&self) -> RpResult<Arc<Vec<CodeItem>>> {
        self.codes(&CodeKind::Sido).await
    }

    pub async fn sigungu_codes(&self, sido_code: &str) -> RpResult<Arc<Vec<CodeItem>>> {
        self.codes(&CodeKind::sigungu(sido_code)).await
    }
}
