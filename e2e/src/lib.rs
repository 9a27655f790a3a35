#[cfg(test)]
mod errors;
#[cfg(test)]
mod metrics;
#[cfg(test)]
mod patching;
#[cfg(test)]
mod scenario;
#[cfg(test)]
mod testkit;
#[cfg(test)]
mod transparency;
