//! Turning effect failures into end-of-stream.
//!
//! Failures inside an effect never reach the loop: the failing invocation
//! simply stops producing events.

use std::any::Any;
use std::fmt::Display;
use std::future::ready;
use std::panic::AssertUnwindSafe;

use futures::stream::{Stream, StreamExt};

/// Yield the `Ok` items of `source` and end at the first `Err`.
pub fn end_on_error<St, T, E>(source: St) -> impl Stream<Item = T>
where
    St: Stream<Item = Result<T, E>>,
    E: Display,
{
    source.scan((), |_, item| {
        ready(match item {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("Effect failed, ending its event stream: {}", err);
                None
            }
        })
    })
}

/// Yield the items of `source` and end if polling it panics.
pub fn end_on_panic<St>(source: St) -> impl Stream<Item = St::Item>
where
    St: Stream,
{
    AssertUnwindSafe(source).catch_unwind().scan((), |_, item| {
        ready(match item {
            Ok(value) => Some(value),
            Err(payload) => {
                tracing::error!(
                    "Effect panicked, ending its event stream: {}",
                    panic_message(payload.as_ref())
                );
                None
            }
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn test_end_on_error_stops_at_first_err() {
        let items: Vec<u8> = end_on_error(stream::iter(vec![Ok(1), Ok(2), Err("boom"), Ok(3)]))
            .collect()
            .await;
        assert_eq!(items, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_end_on_panic_stops_at_panic() {
        let source = stream::iter(vec![1u8, 2, 3]).map(|n| {
            if n == 2 {
                panic!("effect exploded");
            }
            n
        });
        let items: Vec<u8> = end_on_panic(source).collect().await;
        assert_eq!(items, vec![1]);
    }

    #[test]
    fn test_panic_message_reads_string_payloads() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("formatted"));
        assert_eq!(panic_message(payload.as_ref()), "formatted");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
