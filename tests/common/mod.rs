//! In-memory sequencing authority and participants for integration tests
//!
//! The authority keeps, per participant, the operations it has forwarded
//! that the participant has not yet reported seeing. An incoming operation
//! is bridged across those the same way a participant bridges remote
//! operations across its pending log.

#![allow(dead_code)]

use runsync_ot::{
    transform, Controller, ControllerConfig, Operation, ParticipantId, Run, RunSequence, Side,
};
use serde_json::json;
use std::collections::VecDeque;

/// Message from the authority to a participant
#[derive(Debug, Clone)]
pub enum Downstream {
    Remote(ParticipantId, Operation),
    Confirm,
}

/// Operation sent upstream with the number of remote operations seen
#[derive(Debug, Clone)]
pub struct Upstream {
    pub op: Operation,
    pub seen: usize,
}

struct Link {
    participant: ParticipantId,
    outstanding: VecDeque<(ParticipantId, Operation)>,
    acked: usize,
}

pub struct Authority {
    pub document: RunSequence,
    links: Vec<Link>,
}

impl Authority {
    pub fn new(document: RunSequence, participants: &[ParticipantId]) -> Self {
        let links = participants
            .iter()
            .map(|&participant| Link {
                participant,
                outstanding: VecDeque::new(),
                acked: 0,
            })
            .collect();
        Self { document, links }
    }

    /// Sequence one operation from participant `from` (an index)
    pub fn receive(&mut self, from: usize, up: Upstream) -> Vec<(usize, Downstream)> {
        let link = &mut self.links[from];
        let author = link.participant;

        let seen_now = up.seen - link.acked;
        link.outstanding.drain(..seen_now);
        link.acked = up.seen;

        let mut bridged = up.op;
        for (other, forwarded) in link.outstanding.iter_mut() {
            let next = transform(forwarded, &bridged, Side::between(*other, author));
            bridged = transform(&bridged, forwarded, Side::between(author, *other));
            *forwarded = next;
        }

        self.document
            .apply(&bridged)
            .expect("authority applies sequenced operation");
        self.document.coalesce();

        let mut out = Vec::new();
        for (i, link) in self.links.iter_mut().enumerate() {
            if i == from {
                out.push((i, Downstream::Confirm));
            } else {
                link.outstanding.push_back((author, bridged.clone()));
                out.push((i, Downstream::Remote(author, bridged.clone())));
            }
        }
        out
    }
}

pub struct Participant {
    pub controller: Controller,
    pub inbox: VecDeque<Downstream>,
    pub outbox: VecDeque<Upstream>,
    pub seen: usize,
}

impl Participant {
    pub fn new(id: ParticipantId, document: RunSequence) -> Self {
        Self {
            controller: Controller::new(ControllerConfig::new(id), document),
            inbox: VecDeque::new(),
            outbox: VecDeque::new(),
            seen: 0,
        }
    }

    /// Hand recorded operations to the transport
    pub fn flush(&mut self) {
        for op in self.controller.take_outgoing() {
            self.outbox.push_back(Upstream {
                op,
                seen: self.seen,
            });
        }
    }

    /// Process one message from the authority
    pub fn deliver_one(&mut self) -> bool {
        match self.inbox.pop_front() {
            Some(Downstream::Remote(author, op)) => {
                self.controller
                    .apply_remote(author, op)
                    .expect("remote operation applies");
                self.seen += 1;
                true
            }
            Some(Downstream::Confirm) => {
                self.controller.confirm(1).expect("confirmation matches");
                true
            }
            None => false,
        }
    }
}

/// A group of participants around one authority
pub struct Session {
    pub authority: Authority,
    pub participants: Vec<Participant>,
}

impl Session {
    pub fn new(text: &str, ids: &[ParticipantId]) -> Self {
        let document = RunSequence::from_text(text);
        Self {
            authority: Authority::new(document.clone(), ids),
            participants: ids
                .iter()
                .map(|&id| Participant::new(id, document.clone()))
                .collect(),
        }
    }

    pub fn edit(&mut self, who: usize, op: Operation) {
        self.participants[who]
            .controller
            .local_edit(op)
            .expect("local edit applies");
    }

    pub fn flush(&mut self, who: usize) {
        self.participants[who].flush();
    }

    /// Sequence the oldest operation in `who`'s outbox
    pub fn sequence_one(&mut self, who: usize) -> bool {
        let Some(up) = self.participants[who].outbox.pop_front() else {
            return false;
        };
        for (to, message) in self.authority.receive(who, up) {
            self.participants[to].inbox.push_back(message);
        }
        true
    }

    pub fn deliver_one(&mut self, who: usize) -> bool {
        self.participants[who].deliver_one()
    }

    /// Flush, sequence and deliver until nothing is in flight
    pub fn settle(&mut self) {
        loop {
            let mut progressed = false;
            for who in 0..self.participants.len() {
                self.participants[who].flush();
                while self.sequence_one(who) {
                    progressed = true;
                }
            }
            for who in 0..self.participants.len() {
                while self.deliver_one(who) {
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }
    }

    pub fn text(&self, who: usize) -> String {
        self.participants[who].controller.document().text()
    }

    /// Panics unless every participant matches the authority
    pub fn assert_converged(&self) {
        let expected = &self.authority.document;
        for participant in &self.participants {
            let controller = &participant.controller;
            assert_eq!(
                controller.document().text(),
                expected.text(),
                "participant {} diverged",
                controller.participant()
            );
            assert_eq!(controller.document().runs(), expected.runs());
            assert!(controller.pending().is_empty());
        }
    }
}

/// Map raw numbers onto an operation that fits a document of `len`
pub fn arbitrary_edit(len: usize, kind: u8, a: u16, b: u16) -> Operation {
    if kind % 3 != 0 || len == 0 {
        let pos = a as usize % (len + 1);
        let text = ["x", "yz", "hello", "é"][b as usize % 4];
        let run = if b % 5 == 0 {
            Run::new(text, json!({"bold": true}))
        } else {
            Run::plain(text)
        };
        Operation::insert(pos, vec![run])
    } else {
        let start = a as usize % len;
        let end = start + 1 + b as usize % (len - start);
        Operation::erase(start, end).expect("start <= end")
    }
}
