use super::Relu;

#[derive(Clone, Debug)]
pub enum ActFn {
    Relu(Relu),
}

impl ActFn {
    pub fn relu() -> Self {
        ActFn::Relu(Relu)
    }

    pub fn f(&self, x: f32) -> f32 {
        match self {
            ActFn::Relu(a) => a.f(x),
        }
    }

    pub fn df(&self, x: f32) -> f32 {
        match self {
            ActFn::Relu(a) => a.df(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relu_clamps_negative_inputs() {
        let act = ActFn::relu();
        assert_eq!(act.f(-2.0), 0.0);
        assert_eq!(act.f(1.5), 1.5);
        assert_eq!(act.df(-2.0), 0.0);
        assert_eq!(act.df(0.0), 0.0);
        assert_eq!(act.df(1.5), 1.0);
    }
}
