use reqwest::{RequestBuilder, StatusCode, header::ACCEPT_LANGUAGE};
use serde::de::{DeserializeOwned, IgnoredAny};
use tokio_util::sync::CancellationToken;

use super::{
    Client,
    error::{Error, ServiceError},
    retry::{self, RetryDecision},
};

/// Which statuses a call counts as success.
#[derive(Debug, Clone, Copy)]
enum Acceptance<'a> {
    /// Any 2xx plus the statuses the call site declared.
    Success { extra: &'a [StatusCode] },
    /// Exactly 200.
    OkOnly,
}

impl Acceptance<'_> {
    fn declares(&self, status: StatusCode) -> bool {
        match self {
            Acceptance::Success { extra } => extra.contains(&status),
            Acceptance::OkOnly => false,
        }
    }

    fn accepts(&self, status: StatusCode) -> bool {
        match self {
            Acceptance::Success { extra } => status.is_success() || extra.contains(&status),
            Acceptance::OkOnly => status == StatusCode::OK,
        }
    }
}

impl Client {
    /// Issues `request` and decodes the response body into `target`.
    ///
    /// Every 2xx counts as success, and so does every status in `extra`. A
    /// 204 returns right away without touching the body. Declaring 202 in
    /// `extra` makes it a success for this call; otherwise 202, like 429, is
    /// waited out when auto-retry is enabled.
    ///
    /// `target` is only overwritten once the whole body decoded.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        request: RequestBuilder,
        target: Option<&mut T>,
        extra: &[StatusCode],
    ) -> Result<(), Error> {
        self.run(cancel, request, target, Acceptance::Success { extra })
            .await
    }

    /// Like [`Client::execute`] for calls whose response body is of no
    /// interest.
    pub async fn send(
        &self,
        cancel: &CancellationToken,
        request: RequestBuilder,
        extra: &[StatusCode],
    ) -> Result<(), Error> {
        self.execute::<IgnoredAny>(cancel, request, None, extra)
            .await
    }

    /// GETs `url` into `target`. Only 200 is success here; 204 still returns
    /// without reading the body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        url: &str,
        target: &mut T,
    ) -> Result<(), Error> {
        self.fetch(cancel, self.http.get(url), target).await
    }

    /// [`Client::get`] for a request the caller built, e.g. with a query.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        request: RequestBuilder,
        target: &mut T,
    ) -> Result<(), Error> {
        self.run(cancel, request, Some(target), Acceptance::OkOnly)
            .await
    }

    async fn run<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        request: RequestBuilder,
        target: Option<&mut T>,
        acceptance: Acceptance<'_>,
    ) -> Result<(), Error> {
        let request = self.prepare(request)?;
        let mut retries: u32 = 0;

        let response = loop {
            let attempt = request.try_clone().ok_or(Error::UnreplayableRequest)?;
            tracing::debug!(
                method = %attempt.method(),
                url = %attempt.url(),
                retries,
                "dispatching request"
            );

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                sent = self.http.execute(attempt) => sent.map_err(Error::Transport)?,
            };

            let status = response.status();
            if acceptance.declares(status) || !retry::should_retry(status) {
                break response;
            }

            match self.retry.decide(status, response.headers(), retries) {
                RetryDecision::Wait(wait) => {
                    tracing::warn!(
                        status = status.as_u16(),
                        wait_ms = wait.as_millis() as u64,
                        retries,
                        "service asked to back off, retrying"
                    );
                    drop(response);
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(Error::Cancelled),
                        _ = tokio::time::sleep(wait) => {}
                    }
                    retries += 1;
                }
                RetryDecision::Terminal => {
                    tracing::debug!(status = status.as_u16(), retries, "retry declined");
                    return Err(ServiceError::from_response(response).await.into());
                }
                RetryDecision::Disabled => break response,
            }
        };

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }
        if !acceptance.accepts(status) {
            return Err(ServiceError::from_response(response).await.into());
        }

        if let Some(target) = target {
            let body = response.bytes().await.map_err(Error::Transport)?;
            *target = serde_json::from_slice(&body).map_err(Error::Decode)?;
        }

        Ok(())
    }

    fn prepare(&self, request: RequestBuilder) -> Result<reqwest::Request, Error> {
        let request = match self.config.accept_language.as_deref() {
            Some(language) => request.header(ACCEPT_LANGUAGE, language),
            None => request,
        };
        request.build().map_err(Error::InvalidRequest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_acceptance_takes_any_2xx_and_declared_codes() {
        let acceptance = Acceptance::Success {
            extra: &[StatusCode::NOT_MODIFIED],
        };
        assert!(acceptance.accepts(StatusCode::OK));
        assert!(acceptance.accepts(StatusCode::ACCEPTED));
        assert!(acceptance.accepts(StatusCode::NOT_MODIFIED));
        assert!(!acceptance.accepts(StatusCode::NOT_FOUND));
        assert!(acceptance.declares(StatusCode::NOT_MODIFIED));
        assert!(!acceptance.declares(StatusCode::ACCEPTED));
    }

    #[test]
    fn test_ok_only_acceptance() {
        let acceptance = Acceptance::OkOnly;
        assert!(acceptance.accepts(StatusCode::OK));
        assert!(!acceptance.accepts(StatusCode::CREATED));
        assert!(!acceptance.declares(StatusCode::OK));
    }
}
