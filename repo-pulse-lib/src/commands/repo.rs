use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::aggregate::RepoId;
use crate::enrich::{enrich, fetch_base};
use crate::sample::sample_repos;
use clap::Parser;
use ohno::{EnrichableExt, bail};

#[derive(Parser, Debug)]
pub struct RepoArgs {
    /// Repository to enrich, as `owner/name`
    #[arg(value_name = "OWNER/NAME")]
    pub name: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn show_repo<H: Host>(host: &mut H, args: &RepoArgs) -> Result<()> {
    let id = RepoId::parse(&args.name)?;
    let mut common = Common::new(host, &args.common)?;

    if common.offline() {
        let Some(repo) = sample_repos()?.into_iter().find(|r| r.id == id) else {
            bail!("'{id}' is not part of the sample dataset");
        };
        return common.report(&[repo], None);
    }

    let client = common.client()?;
    let base = fetch_base(&client, &id)
        .await
        .map_err(|e| e.enrich_with(|| format!("looking up repository '{id}'")))?;
    let aggregate = enrich(&client, base).await;

    common.report(&[aggregate], None)
}
