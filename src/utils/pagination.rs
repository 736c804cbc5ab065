use serde::Deserialize;
use utoipa::IntoParams;

/// 기본 페이지 크기
pub const DEFAULT_PAGE_LIMIT: u64 = 20;
/// 최대 페이지 크기
pub const MAX_PAGE_LIMIT: u64 = 100;

/// limit/offset 쿼리 파라미터
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// 페이지 크기 (기본 20, 최대 100)
    pub limit: Option<u64>,
    /// 건너뛸 개수 (기본 0)
    pub offset: Option<u64>,
}

impl PageQuery {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// 1..=MAX_PAGE_LIMIT 범위로 보정된 limit
    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}
