use futures::stream::{self, StreamExt, TryStreamExt};
use std::future::Future;

/// 以有限并发执行一组可失败的future，结果顺序与输入顺序一致
///
/// 遇到第一个错误立即返回，尚未完成的future会被丢弃
pub async fn try_do_parallel_with_limit<F, T, E>(
    futures: Vec<F>,
    max_concurrent: usize,
) -> Result<Vec<T>, E>
where
    F: Future<Output = Result<T, E>>,
{
    stream::iter(futures)
        .buffered(max_concurrent.max(1))
        .try_collect()
        .await
}
