pub mod classify;
pub mod init;
pub mod ledger;
pub mod score;
pub mod simulate;
