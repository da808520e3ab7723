//! Property tests for credential resolution.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use proptest::prelude::*;

use forgekey_core::{
    Account, AccountId, CallerContext, CredentialResolver, IdentityError, IdentityResolver,
    IdentityResult, LoadedDirectory, ServerPath,
};

const HOSTS: [&str; 3] = ["github.com", "ghe.corp", "git.example.org"];
const LOGINS: [&str; 3] = ["alice", "bob", "carol"];

/// Identity per account; `None` means the lookup fails.
struct TableIdentity(HashMap<AccountId, Option<String>>);

impl IdentityResolver for TableIdentity {
    async fn username(&self, account: &Account) -> IdentityResult<String> {
        self.0
            .get(&account.id)
            .cloned()
            .flatten()
            .ok_or(IdentityError::Status(502))
    }
}

/// `(host index, login index or failure)` per account, plus an optional default.
fn setup() -> impl Strategy<Value = (Vec<(usize, Option<usize>)>, Option<usize>)> {
    prop::collection::vec((0..HOSTS.len(), prop::option::of(0..LOGINS.len())), 0..8)
        .prop_flat_map(|accounts| {
            let len = accounts.len();
            let default = if len == 0 {
                Just(None::<usize>).boxed()
            } else {
                prop::option::of(0..len).boxed()
            };
            (Just(accounts), default)
        })
}

fn build(
    layout: &[(usize, Option<usize>)],
    default: Option<usize>,
    context: &CallerContext,
) -> CredentialResolver<LoadedDirectory, TableIdentity> {
    let mut accounts = Vec::new();
    let mut identities = HashMap::new();
    for (i, (host, login)) in layout.iter().enumerate() {
        let id = AccountId::new(i64::try_from(i).unwrap());
        let server = ServerPath::parse(HOSTS[*host]).unwrap();
        accounts.push(Account::new(id, format!("a{i}"), server));
        identities.insert(id, login.map(|l| LOGINS[l].to_string()));
    }

    let mut directory = LoadedDirectory::new(accounts);
    if let Some(d) = default {
        let id = AccountId::new(i64::try_from(d).unwrap());
        directory = directory.with_default(context.clone(), id);
    }
    CredentialResolver::new(directory, TableIdentity(identities))
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #[test]
    fn result_respects_server_login_and_default(
        (layout, default) in setup(),
        host in 0..HOSTS.len(),
        login in prop::option::of(0..LOGINS.len()),
    ) {
        let context = CallerContext::new("/repo");
        let resolver = build(&layout, default, &context);
        let url = format!("https://{}/owner/repo.git", HOSTS[host]);
        let login = login.map(|l| LOGINS[l]);

        let found = block_on(resolver.get_suitable_accounts(&context, &url, login));

        let expected: Vec<usize> = layout
            .iter()
            .enumerate()
            .filter(|(_, (h, _))| *h == host)
            .filter(|(_, (_, l))| login.is_none_or(|want| l.map(|l| LOGINS[l]) == Some(want)))
            .map(|(i, _)| i)
            .collect();
        let expected = match default {
            Some(d) if expected.contains(&d) => vec![d],
            _ => expected,
        };

        let mut got: Vec<usize> = found
            .iter()
            .map(|a| usize::try_from(a.id.0).unwrap())
            .collect();
        got.sort_unstable();
        prop_assert_eq!(got, expected);

        let again = block_on(resolver.get_suitable_accounts(&context, &url, login));
        prop_assert_eq!(found, again);
    }
}
