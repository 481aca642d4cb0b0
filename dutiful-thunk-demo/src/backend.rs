// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use async_channel::{Receiver, Sender};
use log::{debug, info, warn};

use crate::global_config::ReplyOrder;

/// A request from a fetch thunk to the simulated backend.
#[derive(Debug)]
pub struct BackendRequest {
    pub id: usize,
    pub fail: bool,
    pub reply: Sender<Result<i64, String>>,
}

/// Value the backend answers for fetch `id`.
pub fn value_for(id: usize) -> i64 {
    (id as i64 + 1) * 10
}

/// Answers fetch requests until every sender is gone.
pub async fn serve(requests: Receiver<BackendRequest>, order: ReplyOrder, expected: usize) {
    if order == ReplyOrder::Reversed {
        let mut held = Vec::with_capacity(expected);
        while held.len() < expected {
            match requests.recv().await {
                Ok(request) => held.push(request),
                Err(_) => break,
            }
        }
        debug!("Answering {} held requests in reverse", held.len());
        for request in held.into_iter().rev() {
            answer(request).await;
        }
    }

    while let Ok(request) = requests.recv().await {
        answer(request).await;
    }
    info!("Backend shutting down");
}

async fn answer(request: BackendRequest) {
    let reply = if request.fail {
        Err(format!("backend refused fetch {}", request.id))
    } else {
        Ok(value_for(request.id))
    };
    if let Err(e) = request.reply.send(reply).await {
        warn!("Failed to answer fetch {}: {e}", request.id);
    }
}
