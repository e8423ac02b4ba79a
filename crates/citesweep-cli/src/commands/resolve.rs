//! Resolve command implementation.

use crate::cli::ResolveArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::providers;
use citesweep_domain::traits::RedirectResolver;
use futures::future::join_all;

/// Execute the resolve command.
pub async fn execute_resolve(args: ResolveArgs, config: Config, formatter: &Formatter) -> Result<()> {
    let mut resolver_config = config.resolver;
    if args.single_hop {
        resolver_config.follow_redirect_chain = false;
    }
    if let Some(timeout) = args.timeout {
        resolver_config.timeout_secs = timeout;
    }

    let resolver = providers::resolver(resolver_config)?;
    let results = join_all(args.urls.iter().map(|url| resolver.resolve(url))).await;
    let results: Vec<_> = args.urls.into_iter().zip(results).collect();

    println!("{}", formatter.format_resolutions(&results)?);
    Ok(())
}
