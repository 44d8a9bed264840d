use std::time::Duration;

use anyhow::{Context, Result};

use super::payload::KnowledgeBasePayload;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// What the user picked in the knowledge-base list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KbSelector {
    Latest,
    Id(String),
}

impl KbSelector {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Latest => "latest",
            Self::Id(id) => id,
        }
    }
}

pub fn knowledge_base_url(base_url: &str, selector: &KbSelector, authorized: bool) -> String {
    let base = base_url.trim_end_matches('/');
    let mut url = match selector {
        KbSelector::Latest => format!("{base}/knowledge-bases?content=latest"),
        KbSelector::Id(id) => format!("{base}/knowledge-bases/{id}"),
    };

    if authorized {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str("authorized=authorized");
    }

    url
}

/// GET the selected knowledge base. Blocking; called from the background
/// load thread only.
pub fn fetch_knowledge_base(
    base_url: &str,
    selector: &KbSelector,
    authorized: bool,
) -> Result<KnowledgeBasePayload> {
    let url = knowledge_base_url(base_url, selector, authorized);

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    let response = client
        .get(&url)
        .send()
        .with_context(|| format!("request to {url} failed"))?
        .error_for_status()
        .with_context(|| format!("{url} returned an error status"))?;

    response
        .json::<KnowledgeBasePayload>()
        .with_context(|| format!("invalid knowledge-base payload from {url}"))
}

#[cfg(test)]
mod tests {
    use super::{KbSelector, knowledge_base_url};

    #[test]
    fn url_for_a_specific_knowledge_base() {
        assert_eq!(
            knowledge_base_url(
                "http://localhost:5000/api",
                &KbSelector::Id("kb-7".to_owned()),
                false
            ),
            "http://localhost:5000/api/knowledge-bases/kb-7"
        );
    }

    #[test]
    fn url_for_the_latest_knowledge_base() {
        assert_eq!(
            knowledge_base_url("http://localhost:5000/api/", &KbSelector::Latest, false),
            "http://localhost:5000/api/knowledge-bases?content=latest"
        );
    }

    #[test]
    fn authorized_flag_appends_the_query_parameter() {
        assert_eq!(
            knowledge_base_url("http://h/api", &KbSelector::Latest, true),
            "http://h/api/knowledge-bases?content=latest&authorized=authorized"
        );
        assert_eq!(
            knowledge_base_url("http://h/api", &KbSelector::Id("k".to_owned()), true),
            "http://h/api/knowledge-bases/k?authorized=authorized"
        );
    }
}
