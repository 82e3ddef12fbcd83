#![cfg(test)]
mod launch;
mod port_scan;
