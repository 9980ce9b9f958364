//! Transit route planner server.
//!
//! A web application that answers: "What is the cheapest way across the
//! city from this stop to that one, given which stops are closed right now?"
//!
//! The network is a grid of intersections crossed by lines. Routes are found
//! by a shortest-path search that charges for every change of line and rides
//! through closed stops where it can.

pub mod domain;
pub mod logger;
pub mod network;
pub mod planner;
pub mod status;
pub mod web;
