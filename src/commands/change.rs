use anyhow::Result;

use crate::cli::ChangeTarget;
use crate::echo;
use crate::menu::{Dispatcher, Frame, Menu, MenuItem};
use crate::store::records::{CustomAccount, Wallet};
use crate::store::sort::sort_wallets;
use crate::store::{self, Store};

pub fn run(store: &Store, target: ChangeTarget) -> Result<()> {
    match target {
        ChangeTarget::Wallet => wallet(store),
        ChangeTarget::Custom => custom(store),
    }
}

/// Store mutations the pickers can commit. Record identity is captured
/// when the menu is built, so the running menu works on a snapshot.
#[derive(Debug, Clone)]
enum ChangeCmd {
    PromoteWallet { private_key: String },
    DeleteWallet { private_key: String },
    /// Full record capture: re-setting it promotes the account (or
    /// restores it verbatim if something removed it since the snapshot).
    PromoteCustom { record: CustomAccount },
    DeleteCustom { account: String, email: String },
    DeleteCustomGroup { account: String },
}

struct StoreDispatcher<'a> {
    store: &'a Store,
}

impl Dispatcher for StoreDispatcher<'_> {
    type Command = ChangeCmd;
    type Output = ();

    fn dispatch(&mut self, command: ChangeCmd) -> store::Result<()> {
        match command {
            ChangeCmd::PromoteWallet { private_key } => {
                self.store.set_wallet(&private_key, None, None).map(|_| ())
            }
            ChangeCmd::DeleteWallet { private_key } => self.store.delete_wallet(&private_key),
            ChangeCmd::PromoteCustom { record } => {
                self.store.set_custom_account(record).map(|_| ())
            }
            ChangeCmd::DeleteCustom { account, email } => {
                self.store.delete_custom_account(&account, &email)
            }
            ChangeCmd::DeleteCustomGroup { account } => self.store.delete_custom_group(&account),
        }
    }
}

fn wallet(store: &Store) -> Result<()> {
    let mut wallets = store.wallets()?;
    if wallets.len() < 2 {
        echo::error("There are no wallets in the store to change.");
        return Ok(());
    }
    sort_wallets(&mut wallets);

    let items = wallets.iter().map(wallet_item).collect();
    let menu = Menu::new(items, "Change the current wallet")?;
    menu.run(&mut StoreDispatcher { store })?;
    Ok(())
}

fn wallet_item(wallet: &Wallet) -> MenuItem<ChangeCmd> {
    let mut name = wallet.label.clone().unwrap_or_else(|| "Wallet".to_string());
    if wallet.current {
        name.push_str(" (Current)");
    }
    MenuItem::command(
        name,
        Some(wallet.public_key.clone()),
        ChangeCmd::PromoteWallet {
            private_key: wallet.private_key.clone(),
        },
    )
    .with_delete(ChangeCmd::DeleteWallet {
        private_key: wallet.private_key.clone(),
    })
}

fn custom(store: &Store) -> Result<()> {
    let accounts = store.custom_accounts(None)?;
    if accounts.is_empty() {
        echo::error("There are no custom accounts in the store to change.");
        return Ok(());
    }

    let items = custom_group_items(accounts);
    if items.is_empty() {
        // every group has a single member — nothing to switch between
        echo::error("There are no custom accounts in the store to change.");
        return Ok(());
    }

    let menu = Menu::new(items, "Change custom account")?;
    menu.run(&mut StoreDispatcher { store })?;
    Ok(())
}

/// One screen option per account group with at least two members, each
/// opening a nested screen of that group's accounts. Deleting a group
/// option removes the whole group.
fn custom_group_items(accounts: Vec<CustomAccount>) -> Vec<MenuItem<ChangeCmd>> {
    let mut groups: Vec<(String, Vec<CustomAccount>)> = Vec::new();
    for account in accounts {
        match groups.iter_mut().find(|(name, _)| *name == account.account) {
            Some((_, members)) => members.push(account),
            None => groups.push((account.account.clone(), vec![account])),
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(name, members)| {
            let children = members.iter().map(custom_item).collect();
            let title = echo::capitalize(&name);
            let frame = Frame::new(format!("Change {title} account"), children);
            MenuItem::screen(title, frame)
                .with_delete(ChangeCmd::DeleteCustomGroup { account: name })
        })
        .collect()
}

fn custom_item(account: &CustomAccount) -> MenuItem<ChangeCmd> {
    let mut name = account.email.clone();
    if account.current {
        name.push_str(" (Current)");
    }
    let mut promoted = account.clone();
    promoted.current = false;
    MenuItem::command(name, None, ChangeCmd::PromoteCustom { record: promoted })
        .with_delete(ChangeCmd::DeleteCustom {
            account: account.account.clone(),
            email: account.email.clone(),
        })
}
