//! GroupLister - ユーザーの所属グループを全ページ取得
//!
//! # フロー
//! 1. `/{user_id}/groups` の最初のページを取得（失敗はそのままエラー）
//! 2. 最初のページに `paging` が無ければ `NoResults`
//! 3. `paging.next` が無くなるまで辿り、`data` をページ順に連結
//!
//! 2 ページ目以降の失敗は warn を出して、それまでの結果を返します（部分成功）。

use std::sync::Arc;

use crate::domain::{Group, GroupPostError, Session};
use crate::ports::GraphApi;

pub const DEFAULT_MAX_PAGES: usize = 500;

pub struct GroupLister {
    api: Arc<dyn GraphApi>,
    max_pages: usize,
}

impl GroupLister {
    pub fn new(api: Arc<dyn GraphApi>, max_pages: usize) -> Self {
        Self {
            api,
            max_pages: max_pages.max(1),
        }
    }

    pub async fn list_groups(&self, session: &Session) -> Result<Vec<Group>, GroupPostError> {
        let first = self
            .api
            .first_group_page(&session.credential, &session.profile.id)
            .await?;
        if first.paging.is_none() {
            return Err(GroupPostError::NoResults);
        }

        let mut next = first.next_cursor().map(str::to_string);
        let mut groups = first.data;
        let mut pages = 1;

        while let Some(url) = next.take() {
            if pages >= self.max_pages {
                tracing::warn!(
                    session = %session.id,
                    pages,
                    "group listing stopped at page limit"
                );
                break;
            }

            match self.api.next_group_page(&url).await {
                Ok(page) => {
                    pages += 1;
                    tracing::debug!(session = %session.id, page = pages, items = page.data.len(), "fetched group page");
                    next = page.next_cursor().map(str::to_string);
                    groups.extend(page.data);
                }
                Err(err) => {
                    tracing::warn!(
                        session = %session.id,
                        fetched = groups.len(),
                        error = %err,
                        "group listing truncated by failed page"
                    );
                }
            }
        }

        Ok(groups)
    }
}
