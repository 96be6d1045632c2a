// Shared test helpers: addresses, packets and fake collaborators

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;

use trafficwatch::address_repo::{LocalAddressProvider, ResolveError, Resolver};
use trafficwatch::capture::{CaptureError, PacketSource};
use trafficwatch::models::{AddressSet, Packet};

pub const LOCAL: &str = "10.0.0.5";
pub const TARGET: &str = "157.240.0.1";

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

pub fn set(addrs: &[&str]) -> AddressSet {
    addrs.iter().map(|a| ip(a)).collect()
}

pub fn packet(src: &str, dst: &str, size: u64) -> Packet {
    Packet::new(ip(src), ip(dst), size)
}

pub fn repeat(p: Packet, n: usize) -> Vec<Packet> {
    std::iter::repeat_n(p, n).collect()
}

/// Resolver answering from a fixed table; domains missing from the table fail.
/// Answers can be swapped between calls to simulate DNS changes.
#[derive(Default)]
pub struct FakeResolver {
    answers: Mutex<HashMap<String, Vec<IpAddr>>>,
}

impl FakeResolver {
    pub fn new(answers: &[(&str, &[&str])]) -> Self {
        let r = Self::default();
        for (domain, addrs) in answers {
            r.set(domain, addrs);
        }
        r
    }

    pub fn set(&self, domain: &str, addrs: &[&str]) {
        self.answers
            .lock()
            .unwrap()
            .insert(domain.to_string(), addrs.iter().map(|a| ip(a)).collect());
    }

    pub fn fail(&self, domain: &str) {
        self.answers.lock().unwrap().remove(domain);
    }
}

impl Resolver for FakeResolver {
    async fn resolve(&self, domain: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let answer = self.answers.lock().unwrap().get(domain).cloned();
        answer.ok_or_else(|| ResolveError::NoAddresses {
            domain: domain.to_string(),
        })
    }
}

pub struct FakeLocal(pub Mutex<AddressSet>);

impl FakeLocal {
    pub fn new(addrs: &[&str]) -> Self {
        Self(Mutex::new(set(addrs)))
    }
}

impl LocalAddressProvider for FakeLocal {
    fn local_addresses(&self) -> anyhow::Result<AddressSet> {
        Ok(self.0.lock().unwrap().clone())
    }
}

/// Packet source replaying scripted slices; once the script runs out every slice is empty.
pub struct ScriptedSource {
    slices: VecDeque<Result<Vec<Packet>, CaptureError>>,
}

impl ScriptedSource {
    pub fn new(slices: Vec<Result<Vec<Packet>, CaptureError>>) -> Self {
        Self {
            slices: slices.into(),
        }
    }
}

impl PacketSource for ScriptedSource {
    fn capture(&mut self, window: Duration) -> Result<Vec<Packet>, CaptureError> {
        match self.slices.pop_front() {
            Some(slice) => slice,
            None => {
                std::thread::sleep(window);
                Ok(Vec::new())
            }
        }
    }
}
