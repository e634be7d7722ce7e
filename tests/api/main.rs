mod donation_flow;
mod helpers;
