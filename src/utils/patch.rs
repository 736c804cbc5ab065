//! 부분 수정(PATCH 성격) 요청 필드 헬퍼
//!
//! 비울 수 있는 필드는 `Option<Option<T>>`로 표현합니다.
//! - 필드 없음: `None` (변경하지 않음)
//! - `null`: `Some(None)` (값 비우기)
//! - 값: `Some(Some(v))`

use serde::{Deserialize, Deserializer};

/// `#[serde(default, deserialize_with = "double_option")]`과 함께 사용
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
